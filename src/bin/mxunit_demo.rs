// mxunit showcase: runs one suite covering every matcher.
// Usage: cargo run --bin mxunit-demo -- [--json] [--color never] [--config report.yaml]

use std::{path::PathBuf, process, time::Duration};

use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use mxunit::{
    arr, obj,
    report::{ColorMode, ConsoleReporter, JsonReporter, ReportConfig, Reporter},
    Class, ClassDef, ErrorValue, Runner, SuiteContext, Value,
};
use regex::Regex;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mxunit-demo", version, about = "Runs the mxunit showcase suite.")]
struct DemoArgs {
    /// Emit the suite report as one JSON line instead of console output.
    #[arg(long)]
    json: bool,

    /// Console color mode; overrides the config file.
    #[arg(long, value_enum)]
    color: Option<ColorArg>,

    /// YAML report configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Wait this long, clear the screen, then run.
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorArg {
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorMode {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorMode::Auto,
            ColorArg::Always => ColorMode::Always,
            ColorArg::Never => ColorMode::Never,
        }
    }
}

fn main() -> miette::Result<()> {
    let filter = EnvFilter::try_from_env("MXUNIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = DemoArgs::parse();
    let mut config = match &args.config {
        Some(path) => ReportConfig::from_path(path)?,
        None => ReportConfig::default(),
    };
    if let Some(color) = args.color {
        config.color = color.into();
    }

    let reporter: Box<dyn Reporter> = if args.json {
        Box::new(JsonReporter::stdout())
    } else {
        Box::new(ConsoleReporter::stdout(config))
    };
    let mut runner = Runner::new(reporter);

    let report = if args.delay_ms > 0 {
        runner.describe_delayed(Duration::from_millis(args.delay_ms), "mxunit", showcase)
    } else {
        runner.describe("mxunit", showcase)
    };

    if !report.all_passed() {
        process::exit(1);
    }
    Ok(())
}

/// Leading-integer parse; `NaN` when there are no leading digits.
fn parse_int(text: &str) -> f64 {
    let digits: String = text.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(f64::NAN)
}

fn showcase(s: &SuiteContext) {
    s.test("toBe / toBeCloseTo / toEqual", |t| {
        let pair = obj! { "a" => 1, "b" => 2 };
        let same = pair.clone();
        t.expect(1 + 2).to_be(3);
        t.expect("hello").to_equal("hello");
        t.expect(&pair).to_be(&same);
        t.expect(&pair).not().to_be(obj! { "a" => 1, "b" => 2 });
        t.expect(0.2 + 0.1).not().to_be(0.3);
        t.expect(0.214).to_be_close_to(0.21);
        t.expect(0.215).not().to_be_close_to_digits(0.21, 4);
        t.expect(0.215).to_be_close_to_digits(0.21, 1);
        t.expect(0.2 + 0.1).to_be_close_to(0.3);
        t.expect(&pair).to_equal(obj! { "a" => 1, "b" => 2 });
        t.expect(&pair).not().to_equal(obj! { "a" => 1, "b" => 2, "c" => 3 });
        t.expect(parse_int("42")).to_equal(42);
        t.expect(parse_int("42")).not().to_equal("42");
    });

    s.test("toBeDefined", |t| {
        let mut tmp = Value::Undefined;
        t.expect(&tmp).not().to_be_defined();
        tmp = Value::from(42);
        t.expect(&tmp).to_be_defined();
    });

    s.test("toBeFalsy / toBeTruthy", |t| {
        for falsy in [
            Value::from(false),
            Value::from(0),
            Value::from(""),
            Value::Null,
            Value::Undefined,
            Value::from(f64::NAN),
        ] {
            t.expect(falsy).to_be_falsy();
        }
        t.expect("false").not().to_be_falsy();
        t.expect(1).to_be_truthy();
        t.expect("a").to_be_truthy();
        t.expect(obj! {}).to_be_truthy();
        t.expect("").not().to_be_truthy();
    });

    s.test("toBeGreaterThan/...OrEqual / toBeLessThan/...OrEqual", |t| {
        t.expect(1).to_be_greater_than(0);
        t.expect(1.0000001).to_be_greater_than(1);
        t.expect(1).to_be_greater_than_or_equal(1);
        t.expect(1).not().to_be_greater_than(1);
        t.expect(1).to_be_less_than(2);
        t.expect(2).to_be_less_than_or_equal(2);
        t.expect(1.0000001).to_be_less_than(2);
        t.expect(1).not().to_be_less_than(1);
    });

    s.test("toBeInstanceOf / toBeNull / toBeUndefined / toBeNaN", |t| {
        let animal = ClassDef::new("Animal");
        let dog = ClassDef::extending("Dog", &animal);
        let rex = Value::instance(&dog, [("name", "Rex")]);
        t.expect(Local::now().naive_local()).to_be_instance_of(Class::Date);
        t.expect(&rex).to_be_instance_of(&animal);
        t.expect(&rex).not().to_be_instance_of(Class::Array);
        t.expect(()).to_be_undefined();
        t.expect(Value::Null).to_be_null();
        t.expect(()).not().to_be_null();
        t.expect(Value::Null).not().to_be_undefined();
        t.expect(parse_int("hello")).to_be_nan();
        t.expect(parse_int("12Days")).not().to_be_nan();
    });

    s.test("toMatch", |t| {
        let games = Regex::new("gam").ok();
        if let Some(games) = games {
            t.expect("football games").to_match(games);
        }
        t.expect("football games").not().to_match("^gam");
        t.expect("football games").to_match("ball");
    });

    s.test("toContain / toContainEqual", |t| {
        let numbers = arr![1, 2, 3];
        let pairs = arr![obj! { "a" => 1, "b" => 2 }, obj! { "c" => 3, "d" => 4 }];
        t.expect(&numbers).to_contain(2);
        t.expect(&numbers).not().to_contain(4);
        t.expect(&pairs).to_contain_equal(obj! { "c" => 3, "d" => 4 });
        t.expect(&pairs).not().to_contain_equal(obj! { "c" => 3, "d" => 5 });
    });

    s.test("toHaveLength / toHaveProperty", |t| {
        let inner = obj! { "c" => 3, "d" => 4 };
        let outer = obj! { "a" => 1, "b" => 2, "z" => inner.clone() };
        t.expect(arr![1, 2, 3, 4]).to_have_length(4);
        t.expect("four").to_have_length(4);
        t.expect(&outer).to_have_property("a");
        t.expect(&outer).to_have_property_value("b", 2);
        t.expect(&outer).not().to_have_property("c");
        t.expect(&outer).not().to_have_property_value("a", 2);
        t.expect(&outer).to_have_property_value("z", &inner);
        t.expect(&outer).not().to_have_property_value("z", obj! { "c" => 3, "d" => 4 });
        t.expect(&outer).to_have_property("z.c");
        t.expect(&outer).to_have_property_value("z.c", 3);
        t.expect(&outer).not().to_have_property_value("z.c", 4);
        t.expect(obj! { "c" => obj! { "d" => 4, "e" => obj! { "f" => 6, "g" => 7 } } })
            .to_have_property_value("c.e.g", 7);
    });

    s.test("toThrow", |t| {
        t.expect_fn(|| -> Result<(), ErrorValue> {
            Err(ErrorValue::named("ReferenceError", "a is not defined"))
        })
        .to_throw();
        t.expect_fn(|| Value::from(0)).not().to_throw();
        t.expect_fn(|| -> Result<(), ErrorValue> { Err(ErrorValue::new("Whoops")) })
            .to_throw_with("oops");
        t.expect_fn(|| -> Result<(), ErrorValue> { Err(ErrorValue::new("Whoops")) })
            .not()
            .to_throw_with("Bad");
        t.expect_fn(|| -> () {
            let items = [1, 2, 3];
            panic!("no item at {}", items.len())
        })
        .to_throw_with("no item at 3");
    });

    s.each([[1, 1, 2], [1, 2, 3], [2, 1, 3]])
        .test("arguments table", |t, [a, b, expected]| {
            t.expect(a + b).to_be(expected);
        });

    s.test("toMatchArray / toMatchDate / toMatchObject", |t| {
        t.expect(arr![1, arr![2, 3], 4]).to_match_array(arr![1, arr![2]]);
        t.expect(arr![1, 2]).not().to_match_array(arr![1, 2, 3]);
        if let (Some(morning), Some(evening)) = (
            NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|d| d.and_hms_opt(8, 0, 0)),
            NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|d| d.and_hms_opt(20, 30, 0)),
        ) {
            t.expect(morning).to_match_date(evening);
        }
        t.expect(obj! { "a" => 1, "b" => obj! { "c" => 2, "d" => 3 } })
            .to_match_object(obj! { "b" => obj! { "c" => 2 } });
        t.expect(obj! { "a" => 1 }).not().to_match_object(obj! { "a" => 1, "b" => 2 });
    });

    s.todo("toHaveBeenCalled()");
    s.todo("toStrictEqual()");
}
