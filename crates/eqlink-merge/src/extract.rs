use eqlink_profile::{ProfileError, Value};

const LIST_START_MARKER: &str = "equipment_definitions:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scanning,
    InList,
}

/// Split the raw document into one text block per equipment definition.
///
/// This is deliberately a hand-rolled line scanner, not a document parse: a
/// whole-document load of the section collapses sibling entries that share a
/// name, and recovering those duplicates is the whole point of the merge
/// pass. Inside the list, a `- ` at column 0 opens a block, any indented or
/// blank line extends the open block verbatim, and other column-0 content
/// ends the section (remaining lines are ignored).
#[must_use]
pub fn extract_definition_blocks(raw: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut state = ScanState::Scanning;

    for line in raw.lines() {
        match state {
            ScanState::Scanning => {
                if line.trim() == LIST_START_MARKER {
                    state = ScanState::InList;
                }
            }
            ScanState::InList => {
                if line.starts_with("- ") {
                    if !current.is_empty() {
                        blocks.push(current.join("\n"));
                    }
                    current = vec![line];
                } else if !line.is_empty() && !line.starts_with(char::is_whitespace) {
                    break;
                } else if !current.is_empty() {
                    current.push(line);
                }
            }
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }
    blocks
}

/// Parse one extracted block as a single equipment record. The block still
/// carries its `- ` list prefix, so it parses as a one-item sequence and the
/// continuation indentation stays valid YAML.
pub fn parse_definition_block(block: &str) -> Result<Value, ProfileError> {
    let parsed = Value::from_yaml_str(block)?;
    let Value::Seq(items) = parsed else {
        return Err(ProfileError::BlockNotRecord);
    };
    match items.into_iter().next() {
        Some(item @ Value::Map(_)) => Ok(item),
        _ => Err(ProfileError::BlockNotRecord),
    }
}
