// Copyright 2026 The bastion-wrapper authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Indirect variable reference resolution.
//!
//! Inventory values may name another variable instead of carrying a literal,
//! e.g. `bastion_host: "{{ gateway_host }}"`. Resolution follows chains of
//! such references with an explicit visited set; a cycle resolves to an
//! empty string, observably identical to an absent variable.

use std::collections::HashSet;

use serde_json::Value;

use crate::inventory::HostVars;

const REF_OPEN: &str = "{{";
const REF_CLOSE: &str = "}}";

/// Extract the referenced variable name if the entire trimmed value is
/// wrapped in `{{ }}` delimiters.
fn reference_key(value: &Value) -> Option<String> {
    let text = value.as_str()?.trim();
    let inner = text.strip_prefix(REF_OPEN)?.strip_suffix(REF_CLOSE)?;
    Some(inner.trim().to_string())
}

/// Dereference `value` against `vars` until a terminal value is reached.
///
/// Non-strings and strings that are not reference-shaped pass through
/// unchanged. Absent keys and cyclic chains both yield an empty string.
pub fn resolve_value(value: &Value, vars: &HostVars) -> Value {
    let mut visited: HashSet<String> = HashSet::new();
    let mut current = value.clone();

    loop {
        let key = match reference_key(&current) {
            Some(key) => key,
            None => return current,
        };

        if !visited.insert(key.clone()) {
            tracing::debug!("cyclic variable reference through {key:?}");
            return Value::String(String::new());
        }

        current = vars
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Value::String(String::new()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(pairs: &[(&str, Value)]) -> HostVars {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn literal_string_passes_through() {
        let v = vars(&[]);
        assert_eq!(resolve_value(&json!("b.example"), &v), json!("b.example"));
    }

    #[test]
    fn non_string_passes_through() {
        let v = vars(&[("a", json!("unused"))]);
        assert_eq!(resolve_value(&json!(68), &v), json!(68));
    }

    #[test]
    fn chain_of_references_resolves() {
        let v = vars(&[("a", json!("{{ b }}")), ("b", json!("final"))]);
        assert_eq!(resolve_value(&json!("{{ a }}"), &v), json!("final"));
    }

    #[test]
    fn cycle_yields_empty_string() {
        let v = vars(&[("a", json!("{{ b }}")), ("b", json!("{{ a }}"))]);
        assert_eq!(resolve_value(&json!("{{ a }}"), &v), json!(""));
    }

    #[test]
    fn self_reference_yields_empty_string() {
        let v = vars(&[("a", json!("{{ a }}"))]);
        assert_eq!(resolve_value(&json!("{{ a }}"), &v), json!(""));
    }

    #[test]
    fn absent_key_yields_empty_string() {
        let v = vars(&[]);
        assert_eq!(resolve_value(&json!("{{ a }}"), &v), json!(""));
    }

    #[test]
    fn partial_delimiters_are_literal() {
        let v = vars(&[("a", json!("other"))]);
        assert_eq!(resolve_value(&json!("{{ a }"), &v), json!("{{ a }"));
        assert_eq!(resolve_value(&json!("x {{ a }}"), &v), json!("x {{ a }}"));
    }

    #[test]
    fn reference_to_number_resolves() {
        let v = vars(&[("port", json!(2222))]);
        assert_eq!(resolve_value(&json!("{{ port }}"), &v), json!(2222));
    }
}
