//! Human-readable labels for the known filter value domains.
//!
//! Tokens of comma-delimited filters label their pills through these
//! tables; codes outside every domain fall back to [`UNKNOWN_LABEL`].

/// Fallback label for codes no domain knows.
pub const UNKNOWN_LABEL: &str = "N/A";

/// Service branch codes.
const BRANCH_LABELS: &[(&str, &str)] = &[
    ("ARMY", "Army"),
    ("NAVY", "Navy"),
    ("MARINES", "Marine Corps"),
    ("AIR_FORCE", "Air Force"),
    ("COAST_GUARD", "Coast Guard"),
    ("SPACE_FORCE", "Space Force"),
    ("OTHER", "Other"),
];

/// Move status codes as they appear in queue rows.
const MOVE_STATUS_LABELS: &[(&str, &str)] = &[
    ("SUBMITTED", "New move"),
    ("APPROVALS REQUESTED", "Approvals requested"),
    ("APPROVED", "Move approved"),
    ("NEEDS SERVICE COUNSELING", "Needs counseling"),
    ("SERVICE COUNSELING COMPLETED", "Service counseling completed"),
];

/// Payment request status codes.
const PAYMENT_REQUEST_STATUS_LABELS: &[(&str, &str)] = &[
    ("PENDING", "Payment requested"),
    ("REVIEWED", "Reviewed"),
    ("PAID", "Paid"),
    ("REJECTED", "Rejected"),
    ("DEFERRED", "Deferred"),
];

fn lookup(table: &[(&str, &'static str)], code: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, label)| *label)
}

/// Label for a service branch code.
pub fn branch_label(code: &str) -> Option<&'static str> {
    lookup(BRANCH_LABELS, code)
}

/// Label for a move status code.
pub fn move_status_label(code: &str) -> Option<&'static str> {
    lookup(MOVE_STATUS_LABELS, code)
}

/// Label for a payment request status code.
pub fn payment_request_status_label(code: &str) -> Option<&'static str> {
    lookup(PAYMENT_REQUEST_STATUS_LABELS, code)
}

/// Pill label for one token of a delimited filter, searched across all
/// known domains.
pub fn value_label(code: &str) -> &'static str {
    branch_label(code)
        .or_else(|| move_status_label(code))
        .or_else(|| payment_request_status_label(code))
        .unwrap_or(UNKNOWN_LABEL)
}
