#[macro_use]
mod common;

#[cfg(test)]
mod method {
    tests!(
        method_call_receives_arguments,
        "class Scale { twice(n) { return n * 2; } } print Scale().twice(21);",
        OK "42"
    );

    tests!(
        bound_method_keeps_its_receiver_even_when_stored,
        "class Foo { bar() { return \"bar on foo\"; } } var m = Foo().bar; print m();",
        OK "bar on foo"
    );

    tests!(
        calling_an_undefined_method_is_a_runtime_error,
        "class Foo {} Foo().missing();",
        ERR "[line 1] RuntimeError: Undefined property 'missing'."
    );
}
