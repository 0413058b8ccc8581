use crate::model::Room;

/// Structural parts of a room label like `"N101"` or `"A007-West"`.
/// `width` is the original digit-run length so cascaded labels keep their
/// zero padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLabel {
    pub prefix: String,
    pub number: u64,
    pub width: usize,
    pub suffix: String,
}

impl RoomLabel {
    /// Zero-pads to at least the original width. A number that outgrows the
    /// width is rendered in full, never truncated.
    pub fn render(&self, number: u64) -> String {
        format!(
            "{}{:0width$}{}",
            self.prefix,
            number,
            self.suffix,
            width = self.width
        )
    }
}

/// Parses a trimmed label against the grammar: optional leading ASCII-letter
/// run, mandatory digit run, optional digit-free suffix. Anything else
/// (including a digit run too long for u64) is unparsed and must not cascade.
pub fn parse_label(label: &str) -> Option<RoomLabel> {
    let trimmed = label.trim();
    let prefix_len = trimmed
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic())
        .count();
    let rest = &trimmed[prefix_len..];
    let digit_len = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digit_len == 0 {
        return None;
    }
    let suffix = &rest[digit_len..];
    if suffix.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    let number = rest[..digit_len].parse::<u64>().ok()?;
    Some(RoomLabel {
        prefix: trimmed[..prefix_len].to_string(),
        number,
        width: digit_len,
        suffix: suffix.to_string(),
    })
}

/// Propagates an edited label to every room strictly after `changed_index`,
/// incrementing the numeric part by position. The changed room itself and
/// everything before it are left alone. An unparsed label is a silent no-op;
/// best effort is the contract here, not an error.
pub fn cascade_labels(rooms: &mut [Room], changed_index: usize, new_label: &str) -> bool {
    let Some(parsed) = parse_label(new_label) else {
        return false;
    };
    if changed_index >= rooms.len() {
        return false;
    }
    for (position, room) in rooms.iter_mut().enumerate().skip(changed_index + 1) {
        let Some(number) = parsed.number.checked_add((position - changed_index) as u64) else {
            break;
        };
        room.label = parsed.render(number);
    }
    true
}
