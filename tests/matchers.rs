//! Matcher behaviour through the public API.
//!
//! Each case runs a one-test suite and inspects the recorded results, so
//! negation, indices and failure messages are checked together with the
//! matcher verdicts.

use mxunit::report::MemoryReporter;
use mxunit::{arr, obj, Class, ClassDef, ErrorValue, ExpectationResult, Runner, TestContext, Value};

fn run(body: impl FnOnce(&TestContext)) -> Vec<ExpectationResult> {
    let mut runner = Runner::new(MemoryReporter::new());
    let report = runner.describe("matchers", |s| s.test("case", body));
    report.tests[0].results().to_vec()
}

fn outcomes(body: impl FnOnce(&TestContext)) -> Vec<bool> {
    run(body).iter().map(|r| r.success).collect()
}

#[cfg(test)]
mod identity {
    use super::*;

    #[test]
    fn to_be_compares_references() {
        let shared = obj! { "a" => 1 };
        let results = outcomes(|t| {
            t.expect(&shared).to_be(&shared);
            t.expect(&shared).to_be(obj! { "a" => 1 });
            t.expect(0.2 + 0.1).to_be(0.3);
            t.expect(f64::NAN).to_be(f64::NAN);
        });
        assert_eq!(results, vec![true, false, false, true]);
    }

    #[test]
    fn to_equal_is_one_level_deep() {
        let results = outcomes(|t| {
            t.expect(obj! { "a" => 1, "b" => 2 }).to_equal(obj! { "b" => 2, "a" => 1 });
            t.expect(obj! { "a" => obj! { "x" => 1 } }).to_equal(obj! { "a" => obj! { "x" => 1 } });
            t.expect(42).to_equal("42");
            t.expect(arr![1, 2]).to_equal(arr![1, 2]);
        });
        assert_eq!(results, vec![true, false, false, true]);
    }

    #[test]
    fn distinct_dates_have_no_keys_to_compare() {
        let a = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let b = chrono::NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
        assert_eq!(outcomes(|t| {
            t.expect(a).to_equal(b);
        }), vec![true]);
    }
}

#[cfg(test)]
mod numbers {
    use super::*;

    #[test]
    fn close_to_defaults_to_two_digits() {
        let results = outcomes(|t| {
            t.expect(0.214).to_be_close_to(0.21);
            t.expect(0.215).to_be_close_to_digits(0.21, 4);
            t.expect(0.215).to_be_close_to_digits(0.21, 1);
            t.expect(0.2 + 0.1).to_be_close_to(0.3);
            t.expect("0.3").to_be_close_to(0.3);
        });
        assert_eq!(results, vec![true, false, true, true, false]);
    }

    #[test]
    fn ordering_matchers() {
        let results = outcomes(|t| {
            t.expect(1).to_be_greater_than(0);
            t.expect(1).to_be_greater_than(1);
            t.expect(1).to_be_greater_than_or_equal(1);
            t.expect(1).to_be_less_than(2);
            t.expect(2).to_be_less_than_or_equal(2);
            t.expect(1).to_be_less_than(1);
            t.expect("b").to_be_greater_than("a");
        });
        assert_eq!(results, vec![true, false, true, true, true, false, true]);
    }

    #[test]
    fn nan_only_matches_numbers() {
        let results = outcomes(|t| {
            t.expect(f64::NAN).to_be_nan();
            t.expect(12).to_be_nan();
            t.expect("hello").to_be_nan();
        });
        assert_eq!(results, vec![true, false, false]);
    }
}

#[cfg(test)]
mod truthiness {
    use super::*;

    #[test]
    fn falsy_values() {
        let results = outcomes(|t| {
            for v in [
                Value::from(false),
                Value::from(0),
                Value::from(-0.0),
                Value::from(""),
                Value::Null,
                Value::Undefined,
                Value::from(f64::NAN),
            ] {
                t.expect(v).to_be_falsy();
            }
            t.expect("false").to_be_falsy();
            t.expect(arr![]).to_be_falsy();
        });
        assert_eq!(results, vec![true, true, true, true, true, true, true, false, false]);
    }

    #[test]
    fn defined_null_undefined() {
        let results = outcomes(|t| {
            t.expect(()).to_be_defined();
            t.expect(Value::Null).to_be_defined();
            t.expect(Value::Null).to_be_null();
            t.expect(()).to_be_null();
            t.expect(()).to_be_undefined();
            t.expect(None::<i32>).to_be_undefined();
        });
        assert_eq!(results, vec![false, true, true, false, true, true]);
    }
}

#[cfg(test)]
mod collections {
    use super::*;

    #[test]
    fn contain_uses_identity_and_contain_equal_uses_structure() {
        let results = outcomes(|t| {
            t.expect(arr![1, 2, 3]).to_contain(2);
            t.expect(arr![1, 2, 3]).to_contain(4);
            t.expect(arr![obj! { "c" => 3 }]).to_contain(obj! { "c" => 3 });
            t.expect(arr![obj! { "c" => 3 }]).to_contain_equal(obj! { "c" => 3 });
            t.expect(arr![obj! { "c" => 3 }]).to_contain_equal(obj! { "c" => 4 });
        });
        assert_eq!(results, vec![true, false, false, true, false]);
    }

    #[test]
    fn contain_on_non_array_reports_undefined() {
        let results = run(|t| {
            t.expect("abc").to_contain("a");
        });
        assert!(!results[0].success);
        assert_eq!(results[0].message(), "Matched value is not an array");
    }

    #[test]
    fn length_of_arrays_strings_and_objects() {
        let results = outcomes(|t| {
            t.expect(arr![1, 2, 3, 4]).to_have_length(4);
            t.expect("héllo").to_have_length(5);
            t.expect(obj! { "length" => 2 }).to_have_length(2);
            t.expect(obj! { "a" => 1 }).to_have_length(1);
            t.expect(7).to_have_length(1);
        });
        assert_eq!(results, vec![true, true, true, false, false]);
    }

    #[test]
    fn match_array_is_a_prefix_subset() {
        let results = outcomes(|t| {
            t.expect(arr![1, 2, 3]).to_match_array(arr![1, 2]);
            t.expect(arr![1, 2]).to_match_array(arr![1, 2, 3]);
            t.expect(arr![arr![1, 2], 3]).to_match_array(arr![arr![1]]);
            t.expect(obj! { "0" => 1 }).to_match_array(arr![1]);
        });
        assert_eq!(results, vec![true, false, true, false]);
    }
}

#[cfg(test)]
mod objects {
    use super::*;

    #[test]
    fn property_paths() {
        let inner = obj! { "c" => 3, "d" => 4 };
        let outer = obj! { "a" => 1, "b" => 2, "z" => inner.clone() };
        let results = outcomes(|t| {
            t.expect(&outer).to_have_property("a");
            t.expect(&outer).to_have_property("c");
            t.expect(&outer).to_have_property_value("b", 2);
            t.expect(&outer).to_have_property_value("a", 2);
            t.expect(&outer).to_have_property_value("z", &inner);
            t.expect(&outer).to_have_property_value("z", obj! { "c" => 3, "d" => 4 });
            t.expect(&outer).to_have_property_value("z.c", 3);
            t.expect(&outer).to_have_property("z.x.y");
        });
        assert_eq!(results, vec![true, false, true, false, true, false, true, false]);
    }

    #[test]
    fn property_failure_messages() {
        let results = run(|t| {
            t.expect(obj! { "a" => 1 }).to_have_property("b");
            t.expect(obj! { "a" => 1 }).to_have_property_value("a", 2);
        });
        assert_eq!(results[0].message(), "{a: 1} does not have property b");
        assert_eq!(results[1].message(), "{a: 1}[a] does not equal 2");
    }

    #[test]
    fn match_object_is_a_recursive_subset() {
        let results = outcomes(|t| {
            t.expect(obj! { "a" => 1, "b" => 2 }).to_match_object(obj! { "a" => 1 });
            t.expect(obj! { "a" => 1 }).to_match_object(obj! { "a" => 1, "b" => 2 });
            t.expect(obj! { "n" => obj! { "x" => 1, "y" => 2 } })
                .to_match_object(obj! { "n" => obj! { "x" => 1 } });
            t.expect(5).to_match_object(obj! { "a" => 1 });
        });
        assert_eq!(results, vec![true, false, true, false]);
    }

    #[test]
    fn instance_of_walks_class_chain() {
        let animal = ClassDef::new("Animal");
        let dog = ClassDef::extending("Dog", &animal);
        let rex = Value::instance(&dog, [("name", "Rex")]);
        let results = outcomes(|t| {
            t.expect(&rex).to_be_instance_of(&dog);
            t.expect(&rex).to_be_instance_of(&animal);
            t.expect(&rex).to_be_instance_of(Class::Object);
            t.expect(arr![]).to_be_instance_of(Class::Array);
            t.expect(1).to_be_instance_of(Class::Object);
        });
        assert_eq!(results, vec![true, true, true, true, false]);
    }
}

#[cfg(test)]
mod text_and_dates {
    use super::*;
    use chrono::NaiveDate;
    use regex::Regex;

    #[test]
    fn to_match_accepts_text_and_regex() {
        let results = outcomes(|t| {
            t.expect("football games").to_match(Regex::new("gam").unwrap());
            t.expect("football games").to_match("^gam");
            t.expect("football games").to_match("ball");
        });
        assert_eq!(results, vec![true, false, true]);
    }

    #[test]
    #[should_panic(expected = "Invalid pattern")]
    fn invalid_text_pattern_is_a_usage_error() {
        run(|t| {
            t.expect("x").to_match("(unclosed");
        });
    }

    #[test]
    fn match_date_compares_calendar_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let morning = day.and_hms_opt(8, 0, 0).unwrap();
        let evening = day.and_hms_opt(20, 0, 0).unwrap();
        let next = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let results = run(|t| {
            t.expect(morning).to_match_date(evening);
            t.expect(morning).to_match_date(next);
            t.expect("2024-03-01").to_match_date(day);
        });
        let success: Vec<bool> = results.iter().map(|r| r.success).collect();
        assert_eq!(success, vec![true, false, false]);
        assert_eq!(results[2].message(), "Received value is not a date");
    }
}

#[cfg(test)]
mod throwing {
    use super::*;

    #[test]
    fn throw_matchers() {
        let results = outcomes(|t| {
            t.expect_fn(|| -> Result<(), ErrorValue> { Err(ErrorValue::new("Whoops")) })
                .to_throw();
            t.expect_fn(|| Value::from(0)).to_throw();
            t.expect_fn(|| -> Result<(), ErrorValue> { Err(ErrorValue::new("Whoops")) })
                .to_throw_with("oops");
            t.expect_fn(|| -> Result<(), ErrorValue> { Err(ErrorValue::new("Whoops")) })
                .to_throw_with("Bad");
            t.expect_fn(|| -> Result<(), ErrorValue> { Err(ErrorValue::new("Whoops")) })
                .to_throw_with(ErrorValue::new("Whoops"));
            t.expect_fn(|| -> () { panic!("exploded") }).to_throw_with("explode");
        });
        assert_eq!(results, vec![true, false, true, false, true, true]);
    }

    #[test]
    fn function_runs_once_per_expect() {
        use std::{cell::Cell, rc::Rc};
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        run(move |t| {
            let e = t.expect_fn(move || {
                counter.set(counter.get() + 1);
            });
            e.not().to_throw();
            e.to_be_defined();
        });
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn no_throw_message() {
        let results = run(|t| {
            t.expect_fn(|| ()).to_throw();
        });
        assert_eq!(results[0].message(), "No error was thrown");
    }
}

#[cfg(test)]
mod negation {
    use std::collections::HashSet;

    use chrono::NaiveDate;
    use mxunit::{Matcher, MatcherKind, ThrowMatch};
    use regex::Regex;

    use super::*;

    /// Received value, matcher, and the verdict it must reach without `.not()`.
    fn verdict_table() -> Vec<(Value, Matcher, bool)> {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let evening = day.and_hms_opt(20, 0, 0).unwrap();
        let next_day = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let throws = |message: &'static str| {
            Value::function(move || -> Result<(), ErrorValue> { Err(ErrorValue::new(message)) })
        };
        let returns = || Value::function(|| Value::from(0));
        let close = |expected: f64| Matcher::ToBeCloseTo {
            expected: Value::from(expected),
            digits: 2,
        };
        let property = |path: &str, value: Option<Value>| Matcher::ToHaveProperty {
            path: path.to_string(),
            value,
        };

        vec![
            (Value::from(1), Matcher::ToBe(Value::from(1)), true),
            (Value::from(1), Matcher::ToBe(Value::from(2)), false),
            (Value::from(0.214), close(0.21), true),
            (Value::from(0.3), close(0.21), false),
            (Value::from(1), Matcher::ToBeDefined, true),
            (Value::Undefined, Matcher::ToBeDefined, false),
            (Value::from(0), Matcher::ToBeFalsy, true),
            (Value::from(1), Matcher::ToBeFalsy, false),
            (Value::from("a"), Matcher::ToBeTruthy, true),
            (Value::from(""), Matcher::ToBeTruthy, false),
            (Value::from(1), Matcher::ToBeGreaterThan(Value::from(0)), true),
            (Value::from(0), Matcher::ToBeGreaterThan(Value::from(0)), false),
            (Value::from(1), Matcher::ToBeGreaterThanOrEqual(Value::from(1)), true),
            (Value::from(0), Matcher::ToBeGreaterThanOrEqual(Value::from(1)), false),
            (Value::from(1), Matcher::ToBeLessThan(Value::from(2)), true),
            (Value::from(2), Matcher::ToBeLessThan(Value::from(2)), false),
            (Value::from(2), Matcher::ToBeLessThanOrEqual(Value::from(2)), true),
            (Value::from(3), Matcher::ToBeLessThanOrEqual(Value::from(2)), false),
            (arr![], Matcher::ToBeInstanceOf(Class::Array), true),
            (Value::from(1), Matcher::ToBeInstanceOf(Class::Object), false),
            (Value::from(f64::NAN), Matcher::ToBeNaN, true),
            (Value::from(1), Matcher::ToBeNaN, false),
            (Value::Null, Matcher::ToBeNull, true),
            (Value::Undefined, Matcher::ToBeNull, false),
            (Value::Undefined, Matcher::ToBeUndefined, true),
            (Value::Null, Matcher::ToBeUndefined, false),
            (arr![1, 2], Matcher::ToContain(Value::from(2)), true),
            (arr![1], Matcher::ToContain(Value::from(2)), false),
            (Value::from("12"), Matcher::ToContain(Value::from("2")), false),
            (arr![obj! { "a" => 1 }], Matcher::ToContainEqual(obj! { "a" => 1 }), true),
            (arr![obj! { "a" => 2 }], Matcher::ToContainEqual(obj! { "a" => 1 }), false),
            (obj! { "a" => 1 }, Matcher::ToContainEqual(obj! { "a" => 1 }), false),
            (obj! { "a" => 1 }, Matcher::ToEqual(obj! { "a" => 1 }), true),
            (obj! { "a" => 2 }, Matcher::ToEqual(obj! { "a" => 1 }), false),
            (arr![1, 2], Matcher::ToHaveLength(2), true),
            (Value::from("abc"), Matcher::ToHaveLength(2), false),
            (obj! { "a" => 1 }, property("a", None), true),
            (arr![10, 20], property("+1", None), false),
            (obj! { "a" => 1 }, property("a", Some(Value::from(1))), true),
            (obj! { "a" => 1 }, property("a", Some(Value::from(2))), false),
            (Value::from("cab"), Matcher::ToMatch(Regex::new("ab").unwrap()), true),
            (Value::from("cb"), Matcher::ToMatch(Regex::new("ab").unwrap()), false),
            (arr![1, 2], Matcher::ToMatchArray(arr![1]), true),
            (arr![2], Matcher::ToMatchArray(arr![1]), false),
            (obj! { "0" => 1 }, Matcher::ToMatchArray(arr![1]), false),
            (Value::from(evening), Matcher::ToMatchDate(Value::from(day)), true),
            (Value::from(evening), Matcher::ToMatchDate(Value::from(next_day)), false),
            (Value::from("2024-03-01"), Matcher::ToMatchDate(Value::from(day)), false),
            (obj! { "a" => 1, "b" => 2 }, Matcher::ToMatchObject(obj! { "a" => 1 }), true),
            (obj! { "b" => 2 }, Matcher::ToMatchObject(obj! { "a" => 1 }), false),
            (throws("Whoops"), Matcher::ToThrow(ThrowMatch::Any), true),
            (returns(), Matcher::ToThrow(ThrowMatch::Any), false),
            (throws("Whoops"), Matcher::ToThrow("oops".into()), true),
            (throws("Bad"), Matcher::ToThrow("oops".into()), false),
        ]
    }

    #[test]
    fn verdict_table_covers_every_matcher() {
        let kinds: HashSet<MatcherKind> = verdict_table().iter().map(|(_, m, _)| m.kind()).collect();
        assert_eq!(kinds.len(), 23);
    }

    #[test]
    fn not_complements_every_verdict() {
        let table = verdict_table();
        let plain_cases = table.clone();
        let plain = run(move |t| {
            for (received, matcher, _) in plain_cases {
                t.expect(received).check(matcher);
            }
        });
        let negated_cases = table.clone();
        let negated = run(move |t| {
            for (received, matcher, _) in negated_cases {
                t.expect(received).not().check(matcher);
            }
        });

        assert_eq!(plain.len(), table.len());
        assert_eq!(negated.len(), table.len());
        for (((_, matcher, want), p), n) in table.iter().zip(&plain).zip(&negated) {
            let kind = matcher.kind();
            assert_eq!(p.success, *want, "{kind} without not");
            assert_eq!(n.success, !p.success, "{kind} with not");
            assert!(n.negated && !p.negated);
            assert_eq!(n.matcher, p.matcher);
            let args = |r: &ExpectationResult| -> Vec<String> {
                r.args.iter().map(ToString::to_string).collect()
            };
            assert_eq!(args(n), args(p), "{kind} args");
        }
    }

    #[test]
    fn double_not_restores_polarity() {
        let results = run(|t| {
            t.expect(1).not().not().to_be(1);
        });
        assert!(results[0].success);
        assert!(!results[0].negated);
    }

    #[test]
    fn negated_failures_are_labelled() {
        let results = run(|t| {
            t.expect(1).not().to_be(1);
        });
        assert_eq!(results[0].label(), "not.toBe");
        assert_eq!(results[0].message(), "1 not the same as 1");
    }

    #[test]
    fn expectation_and_its_negation_share_an_index() {
        let results = run(|t| {
            let e = t.expect(3);
            e.to_be(3);
            e.not().to_be(4);
            t.expect(4).to_be(4);
        });
        let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 1, 2]);
    }
}
