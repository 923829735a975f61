#[macro_use]
mod common;

#[cfg(test)]
mod token {
    tests!(
        unexpected_character_is_a_compile_error,
        "#",
        ERR "[line 1] Error: Unexpected character '#'"
    );

    tests!(
        two_character_operators_are_scanned_as_single_tokens,
        "print 1 != 2; print 1 <= 1; print 2 >= 3;",
        OK "true", "true", "false"
    );

    tests!(
        keywords_are_not_mistaken_for_identifier_prefixes,
        "var classroom = 1; print classroom;",
        OK "1"
    );
}
