//! Shared test helpers

#![allow(dead_code)]

use std::collections::HashMap;

/// Skip the test when any of the given environment variables is missing
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping: missing environment variable {}", $var);
                return;
            }
        )+
    };
}

/// Assert that a `Result` is `Ok` and unwrap it (fails the test otherwise).
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {:?}", res.as_ref().err());
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {:?}",
            format_args!($($msg)+),
            res.as_ref().err()
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Build a configuration map from key/value pairs.
pub fn config(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Successful OPS reply wrapping `attributes` (pre-rendered `<item>` elements).
pub fn ops_reply(response_code: &str, attributes: &str) -> String {
    format!(
        r#"<?xml version='1.0' encoding='UTF-8' standalone='no' ?>
<!DOCTYPE OPS_envelope SYSTEM 'ops.dtd'>
<OPS_envelope>
 <header><version>0.9</version></header>
 <body>
  <data_block>
   <dt_assoc>
    <item key="protocol">XCP</item>
    <item key="action">REPLY</item>
    <item key="response_code">{response_code}</item>
    <item key="response_text">Command successful</item>
    <item key="is_success">1</item>
    <item key="attributes"><dt_assoc>{attributes}</dt_assoc></item>
   </dt_assoc>
  </data_block>
 </body>
</OPS_envelope>"#
    )
}

/// Failed OPS reply.
pub fn ops_failure(response_code: &str, response_text: &str) -> String {
    format!(
        r#"<?xml version='1.0' encoding='UTF-8' standalone='no' ?>
<OPS_envelope>
 <header><version>0.9</version></header>
 <body>
  <data_block>
   <dt_assoc>
    <item key="protocol">XCP</item>
    <item key="action">REPLY</item>
    <item key="response_code">{response_code}</item>
    <item key="response_text">{response_text}</item>
    <item key="is_success">0</item>
   </dt_assoc>
  </data_block>
 </body>
</OPS_envelope>"#
    )
}
