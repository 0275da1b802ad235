use std::fs;

use sof::{
    get_output, get_result,
    interpreter::{evaluator::core::Interpreter, io::IoInterface, source::SourceFile},
};
use walkdir::WalkDir;

fn assert_success(src: &str) {
    if let Err(e) = get_result(src) {
        panic!("Script failed: {e}");
    }
}

fn assert_failure(src: &str) {
    if get_result(src).is_ok() {
        panic!("Script succeeded but was expected to fail")
    }
}

fn assert_output(src: &str, expected: &str) {
    match get_output(src) {
        Ok(output) => assert_eq!(output, expected, "unexpected output of: {src}"),
        Err(e) => panic!("Script failed: {e}\nScript: {src}"),
    }
}

#[test]
fn script_corpus_works() {
    let mut count = 0;

    for entry in WalkDir::new("tests/scripts").into_iter()
                                              .filter_map(Result::ok)
                                              .filter(|e| {
                                                  e.path()
                                                   .extension()
                                                   .is_some_and(|ext| ext == "sof")
                                              })
    {
        let path = entry.path();
        let code =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        count += 1;
        if let Err(e) = get_result(&code) {
            panic!("Script {path:?} failed:\n{e}");
        }
    }

    assert!(count > 0, "No scripts found in tests/scripts");
}

#[test]
fn arithmetic_and_output() {
    assert_output("1 2 + writeln", "3\n");
    assert_output("7 2 - writeln", "5\n");
    assert_output("3 4 * writeln", "12\n");
    assert_output("7 2 / writeln", "3\n");
    assert_output("7 2 % writeln", "1\n");
    assert_output("-7 2 % writeln", "-1\n");
    assert_output("1 2.5 + writeln", "3.5\n");
    assert_output("1 2 + write 4 write", "34");
}

#[test]
fn string_concatenation() {
    assert_output("\"hello, \" \"world\" cat writeln", "hello, world\n");
    assert_success("\"a\" \"b\" cat \"ab\" = assert");
    assert_failure("1 \"b\" cat");
}

#[test]
fn functions_define_and_call() {
    assert_output("{ dup * } 1 function square def  5 square . writeln", "25\n");
    assert_output("{ + } 2 function add def  2 5 add . writeln", "7\n");
}

#[test]
fn while_loop_counts() {
    assert_output("0 { dup 10 < } { dup writeln 1 + } while pop",
                  "0\n1\n2\n3\n4\n5\n6\n7\n8\n9\n");
}

#[test]
fn conditionals() {
    assert_output("true { \"yes\" writeln } { \"no\" writeln } ifelse", "yes\n");
    assert_output("false { \"yes\" writeln } { \"no\" writeln } ifelse", "no\n");
    assert_output("true { 1 writeln } if", "1\n");
    assert_output("false { 1 writeln } if", "");
    assert_failure("5 { 1 } if");
}

#[test]
fn currying() {
    assert_output("{ dup * } 1 function sq def  3 sq curry . writeln", "9\n");
    // currying twice supplies the arguments in order
    assert_output("{ - } 2 function sub def  10 sub curry  3 swap curry . writeln", "7\n");
    // the remaining arity shrinks by one per curry
    assert_output("{ - } 2 function sub def  10 sub curry  3 swap . writeln", "7\n");
    assert_failure("{ dup } 1 function f def  1 f curry 2 swap curry");
    assert_failure("5 1 curry");
}

#[test]
fn integer_literal_bases() {
    assert_output("0b101 writeln", "5\n");
    assert_output("0o17 writeln", "15\n");
    assert_output("0x1f writeln", "31\n");
    assert_output("0d42 writeln", "42\n");
    assert_success("0b101 0o5 = assert  0d5 0x5 = assert  0x5 5 = assert");
    assert_output("-0x10 writeln", "-16\n");
}

#[test]
fn integer_range_is_checked() {
    assert_output("9223372036854775807 writeln", "9223372036854775807\n");
    assert_output("-9223372036854775808 writeln", "-9223372036854775808\n");
    assert_failure("9223372036854775808 writeln");
    assert_failure("1 9223372036854775807 + writeln");
    assert_failure("1 0 /");
    assert_failure("1 0 %");
    assert_failure("1.0 0.0 /");
}

#[test]
fn comparisons_and_equality() {
    assert_success("2 3 < assert");
    assert_success("3 2 > assert");
    assert_success("2 2 <= assert");
    assert_success("3 3 >= assert");
    assert_success("2 3 /= assert");
    assert_success("2 2 = assert");
    assert_success("1 1.0 = assert");
    assert_success("1.5 2 < assert");
    assert_success("\"abc\" \"abd\" < assert");
    assert_failure("1 \"a\" <");
}

#[test]
fn boolean_logic() {
    assert_success("true false or assert");
    assert_success("true true and assert");
    assert_success("true false xor assert");
    assert_success("false not assert");
    assert_failure("1 true and");
}

#[test]
fn definitions_and_lookup() {
    assert_output("5 x def  x . writeln", "5\n");
    assert_output("1 x def  2 x def  x . writeln", "2\n");
    assert_failure("undefined .");
}

#[test]
fn global_definitions_escape_functions() {
    assert_output("{ 42 g globaldef  0 return } 0 function setup def  setup . pop  g . writeln",
                  "42\n");
    // a local definition dies with its frame
    assert_failure("{ 7 local def  0 return } 0 function f def  f . pop  local .");
}

#[test]
fn alias_binds_callables() {
    assert_output("inc { 1 + } ,  5 inc . writeln", "6\n");
    assert_failure("name 5 ,");
}

#[test]
fn return_unwinds_frames() {
    assert_output("{ 1 2 + return } 0 function f def  f . writeln", "3\n");
    // return:2 unwinds through the outer call; its trailing code never runs
    assert_output("{ 5 return:2 } 0 function inner def \
                   { inner . 99 writeln } 0 function outer def \
                   outer . writeln",
                  "5\n");
    assert_failure("5 return");
    assert_failure("{ 1 return:5 } 0 function f def  f .");
    assert_failure("{ 1 return:0 } 0 function f def  f .");
}

#[test]
fn constructors_build_objects() {
    assert_success("{ y def x def } 2 constructor Point def \
                    3 4 Point . p def \
                    p . x : 3 = assert \
                    p . y : 4 = assert");
    // field writes through one handle are visible through another
    assert_success("{ y def x def } 2 constructor Point def \
                    1 2 Point . p def \
                    9 p . x := \
                    p . x : 9 = assert");
    assert_output("{ } 0 constructor Empty def  Empty . describe writeln", "Object Empty:\n\n");
    assert_failure("{ } 0 constructor C def  C . missing :");
    assert_failure("5 x :");
}

#[test]
fn field_round_trip_on_stack_copies() {
    // := then : through a dup'd handle observes the write
    assert_success("{ } 0 constructor Box def \
                    Box . dup 42 swap v := v : 42 = assert");
}

#[test]
fn scope_discipline_across_calls() {
    let mut interpreter = Interpreter::new(IoInterface::buffer()).unwrap();
    interpreter.run(&SourceFile::new("<literal>", "{ dup * } 1 function sq def"))
               .unwrap();
    let scopes = interpreter.scope_depth();
    let depth = interpreter.stack_depth();

    interpreter.run(&SourceFile::new("<literal>", "5 sq ."))
               .unwrap();
    assert_eq!(interpreter.scope_depth(), scopes);
    assert_eq!(interpreter.stack_depth(), depth + 1);
}

#[test]
fn conversions() {
    assert_output("\"0x1f\" convert:int writeln", "31\n");
    assert_output("3.9 convert:int writeln", "3\n");
    assert_output("-3.9 convert:int writeln", "-3\n");
    assert_output("true convert:int writeln", "1\n");
    assert_output("42 convert:float writeln", "42\n");
    assert_output("\"2.5\" convert:float writeln", "2.5\n");
    assert_output("5 convert:string writeln", "5\n");
    assert_success("0 convert:bool not assert");
    assert_success("\"TRUE\" convert:bool assert");
    assert_success("7 convert:bool assert");
    assert_failure("\"abc\" convert:int");
    assert_failure("true convert:float");
    assert_failure("2.5 convert:bool");
}

#[test]
fn describe_replaces_with_debug_string() {
    assert_output("5 describe writeln", "5\n");
    assert_output("\"hi\" describe writeln", "s\"hi\"(2)\n");
}

#[test]
fn asserts_are_counted() {
    assert_success("true assert");
    assert_failure("false assert");

    let mut interpreter = Interpreter::new(IoInterface::buffer()).unwrap();
    interpreter.run(&SourceFile::new("<literal>", "true assert  1 1 = assert"))
               .unwrap();
    assert_eq!(interpreter.assert_count(), 2);
}

#[test]
fn preamble_definitions_are_available() {
    assert_output("3 7 max . writeln", "7\n");
    assert_output("3 7 min . writeln", "3\n");
    assert_output("5 neg . writeln", "-5\n");
    assert_output("-4 abs . writeln", "4\n");
    assert_output("1 2 nip . writeln", "2\n");
    assert_output("7 1 2 drop2 . writeln", "7\n");
}

#[test]
fn native_builtins() {
    assert_output("9 sqrt . writeln", "3\n");
    assert_output("2.5 floor . writeln", "2\n");
    assert_output("2.5 ceil . writeln", "3\n");
    assert_output("2.4 round . writeln", "2\n");
    assert_output("7 floor . writeln", "7\n");
    assert_failure("\"x\" sqrt .");
    assert!(sof::interpreter::evaluator::builtin::NATIVE_FUNCTIONS.contains(&"sqrt"));
}

#[test]
fn comments_and_continuations() {
    assert_output("1 2 + # the sum\nwriteln", "3\n");
    assert_output("#* a\nblock comment *# 4 writeln", "4\n");
    assert_output("1 2 \\\n+ writeln", "3\n");
    assert_output("\"no # comment\" writeln", "no # comment\n");
}

#[test]
fn syntax_errors() {
    assert_failure("{ 1 2");
    assert_failure("}");
    assert_failure("\"unterminated");
    assert_failure("#* unterminated");
    assert_failure("1 2 § +");
}

#[test]
fn stack_errors() {
    assert_failure("pop");
    assert_failure("1 +");
    assert_failure("dup");
}

#[test]
fn errors_render_with_location() {
    let error = get_result("1 1 +\nmissing .").unwrap_err().to_string();
    assert!(error.contains("Name Error"), "missing kind header: {error}");
    assert!(error.contains("<literal>"), "missing file tag: {error}");
    assert!(error.contains("line 2"), "missing line number: {error}");
    assert!(error.contains("missing"), "missing excerpt: {error}");
    assert!(error.contains('^'), "missing caret: {error}");
}
