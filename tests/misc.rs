#[macro_use]
mod common;

#[cfg(test)]
mod misc {
    tests!(
        empty_program_produces_no_output,
        "",
        OK
    );

    tests!(
        precedence_follows_standard_arithmetic_rules,
        "print 2 + 3 * 4; print (2 + 3) * 4; print -2 * -3;",
        OK "14", "20", "6"
    );

    tests!(
        a_script_combining_every_feature_area,
        "class Greeter { \
            init(name) { this.name = name; } \
            greet() { return \"hi, \" + this.name; } \
         } \
         fun shout(greeter) { \
            return greeter.greet() + \"!\"; \
         } \
         var names = \"abc\"; \
         for (var i = 0; i < 1; i = i + 1) { \
            print shout(Greeter(names)); \
         }",
        OK "hi, abc!"
    );
}
