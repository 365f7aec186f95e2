//! Literal builders for arrays and objects.

/// Builds an array [`Value`](crate::Value) from anything convertible into values.
///
/// ```rust
/// use mxunit::arr;
/// let v = arr![1, "two", arr![3]];
/// assert_eq!(v.to_string(), r#"[1, "two", [3]]"#);
/// ```
#[macro_export]
macro_rules! arr {
    () => {
        $crate::Value::array(::std::vec::Vec::<$crate::Value>::new())
    };
    ($($item:expr),+ $(,)?) => {
        $crate::Value::array(::std::vec![$($crate::Value::from($item)),+])
    };
}

/// Builds an object [`Value`](crate::Value) from `key => value` pairs.
///
/// ```rust
/// use mxunit::obj;
/// let v = obj! { "a" => 1, "b" => obj! { "c" => true } };
/// assert_eq!(v.to_string(), "{a: 1, b: {c: true}}");
/// ```
#[macro_export]
macro_rules! obj {
    () => {
        $crate::Value::object(::std::vec::Vec::<(::std::string::String, $crate::Value)>::new())
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::Value::object(::std::vec![$(($key, $crate::Value::from($value))),+])
    };
}
