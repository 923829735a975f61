#[macro_use]
mod common;

#[cfg(test)]
mod number {
    tests!(integral_number_prints_without_decimal_point, "print 3.0;", OK "3");

    tests!(fractional_number_keeps_its_decimal_point, "print 3.25;", OK "3.25");

    tests!(negative_number_literal, "print -7;", OK "-7");

    tests!(
        a_trailing_dot_with_no_digit_is_parsed_as_a_property_access,
        "print 3.;",
        ERR "[line 1] Error at ';': Expect property name after '.'."
    );
}
