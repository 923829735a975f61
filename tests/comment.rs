#[macro_use]
mod common;

#[cfg(test)]
mod comment {
    tests!(line_comment_is_ignored, "// this whole line is a comment\nprint \"ok\";", OK "ok");

    tests!(
        block_comment_is_ignored,
        "/* this is\n   a multi line\n   comment */\nprint \"ok\";",
        OK "ok"
    );

    tests!(
        nested_block_comments_are_supported,
        "/* outer /* inner */ still outer */ print \"ok\";",
        OK "ok"
    );

    tests!(only_comment_produces_no_output, "// just a comment, nothing else", OK);
}
