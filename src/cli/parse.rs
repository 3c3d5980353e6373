use tadist_core::model::{Assignee, GraderLoad, PartId};

/// Parse `login` or `login:offset`
pub fn parse_grader_load(s: &str) -> std::result::Result<GraderLoad, String> {
    s.parse::<GraderLoad>().map_err(|e| e.to_string())
}

/// Parse a TA login or `unassigned`
pub fn parse_assignee(s: &str) -> std::result::Result<Assignee, String> {
    s.parse::<Assignee>().map_err(|e| e.to_string())
}

/// Parse `<assignment>.<part>`
pub fn parse_part_id(s: &str) -> std::result::Result<PartId, String> {
    s.parse::<PartId>().map_err(|e| e.to_string())
}
