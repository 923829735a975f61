#[macro_use]
mod common;

#[cfg(test)]
mod super_expr {
    tests!(
        super_dispatches_to_the_immediate_superclass_method,
        "class A { say() { print \"A\"; } } class B < A { say() { super.say(); } } B().say();",
        OK "A"
    );

    tests!(
        super_skips_the_subclass_override,
        "class A { say() { print \"A\"; } } \
         class B < A { say() { print \"B\"; } } \
         class C < B { say() { super.say(); } } \
         C().say();",
        OK "B"
    );

    tests!(
        super_outside_a_class_is_a_compile_error,
        "super.say();",
        ERR "[line 1] Error at 'super': Can't use 'super' outside of a class."
    );

    tests!(
        super_in_a_class_with_no_superclass_is_a_compile_error,
        "class A { say() { super.say(); } }",
        ERR "[line 1] Error at 'super': Can't use 'super' in a class with no superclass."
    );
}
