/// Runs inline Rocks source through the library directly and asserts on the
/// captured `print` output, or shells out to the compiled `rocks` binary on a
/// temp script file and asserts on its stderr and exit status.
///
/// ```ignore
/// tests!(adds_two_numbers, "print 1 + 1;", OK "2");
/// tests!(cannot_add_number_and_string, "print 1 + \"a\";", ERR "[line 1] RuntimeError: Operands must be two numbers or two strings.");
/// ```
#[macro_export]
macro_rules! tests {
    ($name:ident, $source:expr, OK $($expected:expr),* $(,)?) => {
        #[test]
        fn $name() {
            use rocks_lang::rocks;

            let mut expected = vec![$($expected),*];
            let expected = match expected.len() {
                0 => String::new(),
                _ => {
                    expected.push("");
                    expected.join("\n")
                }
            };

            let mut output = Vec::new();
            let mut instance = rocks::new(&mut output);
            instance.run_source($source);
            drop(instance);

            assert_eq!(expected, std::str::from_utf8(&output).unwrap());
        }
    };

    ($name:ident, $source:expr, ERR $($expected:expr),+ $(,)?) => {
        #[test]
        fn $name() {
            use assert_cmd::Command;

            let expected = vec![$($expected),+].join("\n");

            let path = std::env::temp_dir()
                .join(format!("rocks-test-{}-{}.rocks", stringify!($name), std::process::id()));
            std::fs::write(&path, $source).expect("writing a temp script file");

            Command::cargo_bin("rocks").unwrap()
                .arg(&path)
                .assert()
                .stderr(format!("{expected}\n"))
                .failure();

            let _ = std::fs::remove_file(&path);
        }
    };
}
