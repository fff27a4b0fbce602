use std::collections::BTreeMap;
use std::fmt;

use super::Quoted;

/// Property keys whose values never show up in redacted output.
const SENSITIVE_KEYS: &[&str] = &[
    "password",
    "kerberos_keytab_content",
    "bos_secret_accesskey",
    "aws.s3.access_key",
    "aws.s3.secret_key",
    "fs.s3a.secret.key",
];
const HIDDEN_VALUE: &str = "***";

fn is_sensitive(key: &str) -> bool {
    let key = key.to_lowercase();
    SENSITIVE_KEYS.contains(&key.as_str()) || key.ends_with(".password")
}

/// Canonical text of a property map: entries sorted by key, `,` between entries.
pub struct PrintableMap<'m> {
    map: &'m BTreeMap<String, String>,
    key_value_separator: &'m str,
    with_quotation: bool,
    wrap: bool,
    hide_sensitive: bool,
}

impl<'m> PrintableMap<'m> {
    pub fn new(
        map: &'m BTreeMap<String, String>,
        key_value_separator: &'m str,
        with_quotation: bool,
        wrap: bool,
    ) -> Self {
        PrintableMap {
            map,
            key_value_separator,
            with_quotation,
            wrap,
            hide_sensitive: false,
        }
    }

    pub fn with_hidden_sensitive(mut self) -> Self {
        self.hide_sensitive = true;
        self
    }

    fn write_text(&self, f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
        if self.with_quotation {
            write!(f, "{}", Quoted::string(text))
        } else {
            write!(f, "{}", text)
        }
    }
}

impl fmt::Display for PrintableMap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (key, value)) in self.map.iter().enumerate() {
            if index > 0 {
                write!(f, ",{}", if self.wrap { "\n" } else { " " })?;
            }
            self.write_text(f, key)?;
            write!(f, "{}", self.key_value_separator)?;
            if self.hide_sensitive && is_sensitive(key) {
                self.write_text(f, HIDDEN_VALUE)?;
            } else {
                self.write_text(f, value)?;
            }
        }
        Ok(())
    }
}
