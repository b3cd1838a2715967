//! Enumerated option catalogs and wire-value mapping.
//!
//! Each classification field on a lead (stage, priority, source) has a
//! fixed catalog pairing the internal label shown to sales staff with
//! the wire value the API speaks. Mapping never fails: unknown internal
//! labels pass through unchanged on the way out, and unknown wire
//! values coerce to the catalog's fallback on the way in, so records
//! keep rendering when the client and server catalogs drift apart.

/// One catalog member: an internal label and its wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionEntry {
    pub label: &'static str,
    pub wire: &'static str,
}

/// A fixed catalog of options for one classification field.
#[derive(Debug, Clone, Copy)]
pub struct OptionSet {
    /// Field name the catalog belongs to, e.g. `"stage"`.
    pub name: &'static str,
    pub entries: &'static [OptionEntry],
    /// Label used when a wire value matches no entry.
    pub fallback: &'static str,
}

const fn entry(label: &'static str, wire: &'static str) -> OptionEntry {
    OptionEntry { label, wire }
}

/// Pipeline stages a lead moves through.
pub const STAGES: OptionSet = OptionSet {
    name: "stage",
    entries: &[
        entry("Fresh Lead", "fresh"),
        entry("Contacted", "contacted"),
        entry("Follow Up", "follow_up"),
        entry("Site Visit", "site_visit"),
        entry("Negotiation", "negotiation"),
        entry("Closed Won", "won"),
        entry("Closed Lost", "lost"),
    ],
    fallback: "Fresh Lead",
};

/// Lead temperature.
pub const PRIORITIES: OptionSet = OptionSet {
    name: "priority",
    entries: &[
        entry("General", "general"),
        entry("Cold", "cold"),
        entry("Warm", "warm"),
        entry("Hot", "hot"),
    ],
    fallback: "General",
};

/// Acquisition channel the lead arrived through.
pub const SOURCES: OptionSet = OptionSet {
    name: "source",
    entries: &[
        entry("Other", "other"),
        entry("Website", "website"),
        entry("Referral", "referral"),
        entry("Facebook", "facebook"),
        entry("Google Ads", "google_ads"),
        entry("Walk In", "walk_in"),
    ],
    fallback: "Other",
};

impl OptionSet {
    /// Whether `label` is a member of this catalog.
    pub fn contains(&self, label: &str) -> bool {
        self.entries.iter().any(|e| e.label == label)
    }

    /// Map an internal label to its wire value.
    ///
    /// Labels outside the catalog pass through unchanged; the server
    /// decides whether it accepts them.
    pub fn to_wire<'a>(&self, label: &'a str) -> &'a str {
        match self.entries.iter().find(|e| e.label == label) {
            Some(e) => e.wire,
            None => label,
        }
    }

    /// Map a raw wire value back to an internal label.
    ///
    /// A raw value that is itself a recognized internal label is kept
    /// (older records stored labels directly); anything else becomes the
    /// catalog fallback.
    pub fn from_wire<'a>(&self, raw: &'a str) -> &'a str {
        if let Some(e) = self.entries.iter().find(|e| e.wire == raw) {
            return e.label;
        }
        if self.contains(raw) {
            return raw;
        }
        self.fallback
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_every_catalog_member() {
        for set in [STAGES, PRIORITIES, SOURCES] {
            for e in set.entries {
                assert_eq!(set.from_wire(set.to_wire(e.label)), e.label);
            }
        }
    }

    #[test]
    fn stage_maps_to_wire_value() {
        assert_eq!(STAGES.to_wire("Follow Up"), "follow_up");
        assert_eq!(STAGES.to_wire("Closed Won"), "won");
    }

    #[test]
    fn unknown_label_passes_through_unchanged() {
        assert_eq!(STAGES.to_wire("Archived"), "Archived");
    }

    #[test]
    fn unknown_wire_value_falls_back() {
        assert_eq!(STAGES.from_wire("zombie"), "Fresh Lead");
        assert_eq!(PRIORITIES.from_wire(""), "General");
        assert_eq!(SOURCES.from_wire("carrier_pigeon"), "Other");
    }

    #[test]
    fn internal_label_on_the_wire_is_kept() {
        // Legacy records stored the display label directly.
        assert_eq!(STAGES.from_wire("Negotiation"), "Negotiation");
        assert_eq!(PRIORITIES.from_wire("Hot"), "Hot");
    }

    #[test]
    fn catalog_fallbacks_are_members() {
        for set in [STAGES, PRIORITIES, SOURCES] {
            assert!(set.contains(set.fallback), "{} fallback", set.name);
        }
    }
}
