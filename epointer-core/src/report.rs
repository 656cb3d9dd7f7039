//! Output formatting for type listings - plaintext and JSON.

use serde_json::{json, Value};

use crate::consts::TypeGroups;

/// Renders type groups as plain text.
pub fn plain_listing(package: &str, groups: &TypeGroups) -> String {
    if groups.is_empty() {
        return format!("No enumerated types found in package {}.\n", package);
    }
    let mut out = format!("TYPES IN {} ({}):\n", package, groups.len());
    for group in groups {
        out.push_str(&format!(
            "- {} ({}): {}\n",
            group.type_name,
            group.constants.len(),
            group.constants.join(", ")
        ));
    }
    out
}

/// Renders type groups as a JSON value.
pub fn json_listing(package: &str, groups: &TypeGroups) -> Value {
    json!({
        "package": package,
        "types": groups.as_slice(),
    })
}

/// Prints type groups in plain text format.
pub fn print_plain(package: &str, groups: &TypeGroups) {
    print!("{}", plain_listing(package, groups));
}

/// Prints type groups in JSON format.
pub fn print_json(package: &str, groups: &TypeGroups) {
    match serde_json::to_string_pretty(&json_listing(package, groups)) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!("{{\"package\": {:?}, \"types\": {:?}}}", package, groups.type_names());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::NamedType;

    fn sample() -> TypeGroups {
        let mut groups = TypeGroups::new();
        groups.insert(&NamedType::new("Status"), "StatusOK");
        groups.insert(&NamedType::new("Status"), "StatusError");
        groups.insert(&NamedType::new("Unum"), "m2");
        groups
    }

    #[test]
    fn test_plain_listing() {
        let text = plain_listing("main", &sample());
        assert_eq!(
            text,
            "TYPES IN main (2):\n- Status (2): StatusOK, StatusError\n- Unum (1): m2\n"
        );
    }

    #[test]
    fn test_plain_listing_empty() {
        assert!(plain_listing("p", &TypeGroups::new()).starts_with("No enumerated types"));
    }

    #[test]
    fn test_json_listing() {
        let value = json_listing("main", &sample());
        assert_eq!(value["package"], "main");
        assert_eq!(value["types"][0]["type_name"], "Status");
        assert_eq!(value["types"][0]["constants"][1], "StatusError");
        assert_eq!(value["types"][1]["type_name"], "Unum");
    }
}
