#[macro_use]
mod common;

#[cfg(test)]
mod regression {
    // A method looked up twice off the same instance must produce two
    // distinct bound closures that still share the instance's state.
    tests!(
        repeated_method_lookup_shares_instance_state,
        "class Counter { init() { this.n = 0; } bump() { this.n = this.n + 1; return this.n; } } \
         var c = Counter(); \
         print c.bump(); \
         print c.bump();",
        OK "1", "2"
    );

    // A superclass method binding `this` from inside `super.m()` must still
    // resolve to the calling instance, not the superclass.
    tests!(
        super_call_keeps_the_original_receiver,
        "class A { whoAmI() { return this; } } \
         class B < A { whoAmI() { return super.whoAmI(); } } \
         var b = B(); \
         print b.whoAmI() == b;",
        OK "true"
    );
}
