//! Text codecs for the settings record and the user preset list
//!
//! Decoding is tolerant: malformed lines are skipped one by one and never
//! fail the whole record.

use cc_core::SliderValues;

use crate::preset::Preset;

const KEY_SPLICE: &str = "SpliceValue";
const KEY_CRISP: &str = "CrispValue";
const KEY_OFFSET: &str = "OffsetValue";
const KEY_CURVE: &str = "CurveIndex";

/// Field separator in the user preset file
pub const PRESET_FIELD_SEPARATOR: char = '|';

/// Encode settings as `key=value` lines
pub fn encode_settings(values: &SliderValues) -> String {
    format!(
        "{KEY_SPLICE}={}\n{KEY_CRISP}={}\n{KEY_OFFSET}={}\n{KEY_CURVE}={}\n",
        values.splice, values.crisp, values.offset, values.curve
    )
}

/// Decode `key=value` lines on top of the defaults.
///
/// Unknown keys, lines without exactly one `=`, and non-integer values are ignored.
pub fn decode_settings(text: &str) -> SliderValues {
    let mut values = SliderValues::default();

    for line in text.lines() {
        let parts: Vec<&str> = line.split('=').collect();
        if parts.len() != 2 {
            continue;
        }

        let key = parts[0].trim();
        let Ok(value) = parts[1].trim().parse::<i32>() else {
            log::debug!("Ignoring malformed settings line: {:?}", line);
            continue;
        };

        match key {
            KEY_SPLICE => values.splice = value,
            KEY_CRISP => values.crisp = value,
            KEY_OFFSET => values.offset = value,
            KEY_CURVE => values.curve = value,
            _ => {}
        }
    }

    values
}

/// Encode user presets, one `name|splice|crisp|offset|curve` record per line.
/// Built-in presets are never written.
pub fn encode_user_presets(presets: &[Preset]) -> String {
    let mut out = String::new();
    for preset in presets.iter().filter(|p| p.is_user()) {
        let v = &preset.values;
        out.push_str(&format!(
            "{}|{}|{}|{}|{}\n",
            preset.name, v.splice, v.crisp, v.offset, v.curve
        ));
    }
    out
}

/// Decode user preset records. Blank lines, records without exactly five
/// fields and records with a non-integer numeric field are skipped.
pub fn decode_user_presets(text: &str) -> Vec<Preset> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let record = decode_preset_record(line);
            if record.is_none() {
                log::debug!("Skipping malformed preset record: {:?}", line);
            }
            record
        })
        .collect()
}

fn decode_preset_record(line: &str) -> Option<Preset> {
    let parts: Vec<&str> = line.split(PRESET_FIELD_SEPARATOR).collect();
    if parts.len() != 5 {
        return None;
    }

    let field = |i: usize| parts[i].trim().parse::<i32>().ok();
    let values = SliderValues::new(field(1)?, field(2)?, field(3)?, field(4)?);

    Some(Preset::user(parts[0], values))
}
