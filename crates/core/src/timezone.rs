//! Maps the human-friendly zone labels offered to admins onto IANA zones.

use chrono_tz::Tz;

use crate::errors::{SyncError, SyncResult};

/// Labels offered in team setup, paired with their canonical zone.
pub const TIMEZONE_LABELS: [(&str, Tz); 40] = [
    ("UTC", Tz::UTC),
    ("London", Tz::Europe__London),
    ("New York", Tz::America__New_York),
    ("Los Angeles", Tz::America__Los_Angeles),
    ("Chicago", Tz::America__Chicago),
    ("Denver", Tz::America__Denver),
    ("Phoenix", Tz::America__Phoenix),
    ("Toronto", Tz::America__Toronto),
    ("Mexico City", Tz::America__Mexico_City),
    ("Buenos Aires", Tz::America__Argentina__Buenos_Aires),
    ("Rio de Janeiro", Tz::America__Sao_Paulo),
    ("Santiago", Tz::America__Santiago),
    ("Vancouver", Tz::America__Vancouver),
    ("Honolulu", Tz::Pacific__Honolulu),
    ("Anchorage", Tz::America__Anchorage),
    ("Paris", Tz::Europe__Paris),
    ("Berlin", Tz::Europe__Berlin),
    ("Madrid", Tz::Europe__Madrid),
    ("Rome", Tz::Europe__Rome),
    ("Moscow", Tz::Europe__Moscow),
    ("Istanbul", Tz::Europe__Istanbul),
    ("Dubai", Tz::Asia__Dubai),
    ("Jerusalem", Tz::Asia__Jerusalem),
    ("Johannesburg", Tz::Africa__Johannesburg),
    ("Cairo", Tz::Africa__Cairo),
    ("Nairobi", Tz::Africa__Nairobi),
    ("Mumbai", Tz::Asia__Kolkata),
    ("Delhi", Tz::Asia__Kolkata),
    ("Bangkok", Tz::Asia__Bangkok),
    ("Singapore", Tz::Asia__Singapore),
    ("Hong Kong", Tz::Asia__Hong_Kong),
    ("Shanghai", Tz::Asia__Shanghai),
    ("Tokyo", Tz::Asia__Tokyo),
    ("Seoul", Tz::Asia__Seoul),
    ("Sydney", Tz::Australia__Sydney),
    ("Melbourne", Tz::Australia__Melbourne),
    ("Auckland", Tz::Pacific__Auckland),
    ("Brisbane", Tz::Australia__Brisbane),
    ("Perth", Tz::Australia__Perth),
    ("Jakarta", Tz::Asia__Jakarta),
];

/// Most suggestions a Discord autocomplete response may carry.
pub const MAX_SUGGESTIONS: usize = 25;

/// Resolves a label to a zone, or reports it as unknown.
///
/// Curated labels match case-insensitively; canonical IANA names such as
/// `Europe/Paris` are accepted as they are.
pub fn try_resolve(label: &str) -> SyncResult<Tz> {
    let wanted = label.trim();
    TIMEZONE_LABELS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
        .map(|(_, tz)| *tz)
        .or_else(|| wanted.parse::<Tz>().ok())
        .ok_or_else(|| SyncError::InvalidTimezoneLabel(label.to_string()))
}

/// Resolves a label to a zone, falling back to UTC for anything unknown.
pub fn resolve(label: &str) -> Tz {
    try_resolve(label).unwrap_or_else(|_| {
        tracing::debug!(label, "unknown timezone label, using UTC");
        Tz::UTC
    })
}

/// Curated labels containing `fragment`, for autocomplete.
pub fn suggest(fragment: &str) -> Vec<&'static str> {
    let fragment = fragment.trim().to_lowercase();
    TIMEZONE_LABELS
        .iter()
        .map(|(name, _)| *name)
        .filter(|name| name.to_lowercase().contains(&fragment))
        .take(MAX_SUGGESTIONS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("New York", Tz::America__New_York)]
    #[case("new york", Tz::America__New_York)]
    #[case("  Tokyo ", Tz::Asia__Tokyo)]
    #[case("Europe/Paris", Tz::Europe__Paris)]
    #[case("UTC", Tz::UTC)]
    fn known_labels_resolve(#[case] label: &str, #[case] expected: Tz) {
        assert_eq!(resolve(label), expected);
    }

    #[test]
    fn unknown_label_falls_back_to_utc() {
        assert_eq!(resolve("Nonexistent Place"), Tz::UTC);
        assert_eq!(resolve(""), Tz::UTC);
    }

    #[test]
    fn try_resolve_reports_unknown_label() {
        let err = try_resolve("Atlantis").unwrap_err();
        assert!(matches!(err, SyncError::InvalidTimezoneLabel(label) if label == "Atlantis"));
    }

    #[test]
    fn labels_are_unique() {
        let mut names: Vec<_> = TIMEZONE_LABELS.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TIMEZONE_LABELS.len());
    }

    #[test]
    fn suggestions_filter_and_cap() {
        assert_eq!(suggest("york"), vec!["New York"]);
        assert_eq!(suggest("").len(), MAX_SUGGESTIONS);
    }
}
