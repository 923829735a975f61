#[macro_use]
mod common;

#[cfg(test)]
mod class {
    tests!(empty_class_prints_its_name, "class Foo {} print Foo;", OK "Foo");

    tests!(instance_prints_class_and_instance, "class Foo {} print Foo();", OK "Foo instance");

    tests!(
        class_cannot_inherit_from_itself,
        "class Foo < Foo {}",
        ERR "[line 1] Error at 'Foo': A class can't inherit from itself."
    );

    tests!(
        inherited_method_is_visible_on_subclass,
        "class A { greet() { print \"hi\"; } } class B < A {} B().greet();",
        OK "hi"
    );

    tests!(
        reference_to_itself_inside_method_body_is_fine,
        "class Foo { ping() { print Foo; } } Foo().ping();",
        OK "Foo"
    );
}
