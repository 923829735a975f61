#[macro_use]
mod common;

#[cfg(test)]
mod assignment {
    tests!(assignment_is_right_associative, "var a; var b; a = b = 2; print a; print b;", OK "2", "2");

    tests!(
        assigning_to_a_global_is_visible_after_the_assignment,
        "var a = \"before\"; print a; a = \"after\"; print a;",
        OK "before", "after"
    );

    tests!(
        assigning_to_a_local_is_visible_after_the_assignment,
        "{ var a = \"before\"; print a; a = \"after\"; print a; }",
        OK "before", "after"
    );

    tests!(assignment_is_an_expression_and_yields_its_value, "var a; print a = 4;", OK "4");

    tests!(
        assigning_to_an_undeclared_name_is_a_runtime_error,
        "unknown = 1;",
        ERR "[line 1] RuntimeError: Undefined variable 'unknown'."
    );

    tests!(
        an_invalid_assignment_target_is_reported_but_parsing_continues,
        "1 = 2; print \"after\";",
        ERR "[line 1] Error at '=': Invalid assignment target."
    );
}
