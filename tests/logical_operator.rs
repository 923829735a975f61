#[macro_use]
mod common;

#[cfg(test)]
mod logical_operator {
    tests!(
        and_returns_the_first_falsy_operand,
        "print false and \"x\"; print 1 and 2;",
        OK "false", "2"
    );

    tests!(
        or_returns_the_first_truthy_operand,
        "print false or \"x\"; print 1 or 2;",
        OK "x", "1"
    );

    tests!(
        and_short_circuits_and_never_evaluates_the_right_side,
        "fun sideEffect() { print \"evaluated\"; return true; } false and sideEffect();",
        OK
    );

    tests!(
        or_short_circuits_and_never_evaluates_the_right_side,
        "fun sideEffect() { print \"evaluated\"; return true; } true or sideEffect();",
        OK
    );
}
