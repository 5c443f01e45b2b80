//! Serde adapter for the `Yes`/`No` boolean flags used in the store files.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "Yes" } else { "No" })
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.trim() {
        "Yes" | "yes" | "YES" | "true" | "True" => Ok(true),
        "" | "No" | "no" | "NO" | "false" | "False" => Ok(false),
        other => Err(D::Error::custom(format!("expected Yes or No, got '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Flag {
        #[serde(with = "super")]
        value: bool,
    }

    #[test]
    fn writes_yes_no() {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.serialize(Flag { value: true }).unwrap();
        wtr.serialize(Flag { value: false }).unwrap();
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        assert!(out.contains("Yes"));
        assert!(out.contains("No"));
    }

    #[test]
    fn reads_mixed_case_and_empty() {
        let data = "value\nYes\nno\n\ntrue\n";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let flags: Vec<Flag> = rdr.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(
            flags.iter().map(|f| f.value).collect::<Vec<_>>(),
            vec![true, false, false, true]
        );
    }

    #[test]
    fn rejects_garbage() {
        let data = "value\nmaybe\n";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let result: Result<Vec<Flag>, _> = rdr.deserialize().collect();
        assert!(result.is_err());
    }
}
