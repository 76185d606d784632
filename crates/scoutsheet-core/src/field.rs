//! Form field model and the field-line parser.
//!
//! A field line looks like `TYPE<arg1,arg2> ;; desc1,desc2 ;; key1,key2`.
//! Segments are separated by `;;`; the bracketed argument list is optional
//! and only meaningful for some types.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::ScoutError;

/// Segment delimiter in field lines.
pub const SEGMENT_DELIMITER: &str = ";;";

/// The closed set of form element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Label,
    Space,
    TextField,
    Stepper,
    Switch,
    Slider,
    SegmentedControl,
}

impl FieldType {
    /// Every registered type, in declaration order.
    pub const ALL: [FieldType; 7] = [
        FieldType::Label,
        FieldType::Space,
        FieldType::TextField,
        FieldType::Stepper,
        FieldType::Switch,
        FieldType::Slider,
        FieldType::SegmentedControl,
    ];

    /// Look up a type by its configuration label.
    ///
    /// Matching trims surrounding whitespace and ignores case, but otherwise
    /// requires the exact spelling (`SEGMENTED_CONTROL`, not `segmented control`).
    pub fn lookup(label: &str) -> Option<FieldType> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(label))
    }

    /// Canonical configuration label.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Label => "LABEL",
            FieldType::Space => "SPACE",
            FieldType::TextField => "TEXTFIELD",
            FieldType::Stepper => "STEPPER",
            FieldType::Switch => "SWITCH",
            FieldType::Slider => "SLIDER",
            FieldType::SegmentedControl => "SEGMENTED_CONTROL",
        }
    }

    /// Whether lines of this type carry a key segment.
    pub fn has_keys(&self) -> bool {
        !matches!(self, FieldType::Label | FieldType::Space)
    }

    /// Whether lines of this type carry a description segment.
    pub fn has_descriptions(&self) -> bool {
        !matches!(self, FieldType::Space)
    }

    /// Whether the bracketed arguments affect derived columns or scoring.
    pub fn uses_arguments(&self) -> bool {
        matches!(self, FieldType::TextField | FieldType::SegmentedControl)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::lookup(s).ok_or_else(|| ScoutError::UnrecognizedFieldType(s.trim().to_string()))
    }
}

/// How a text field's answer should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Number,
    Decimal,
    Text,
}

impl TextFormat {
    fn from_argument(argument: Option<&str>) -> Self {
        match argument.map(str::to_ascii_lowercase).as_deref() {
            Some("number") => TextFormat::Number,
            Some("decimal") => TextFormat::Decimal,
            _ => TextFormat::Text,
        }
    }

    /// Numeric text fields are exported as a column and bound in formulas.
    pub fn is_numeric(&self) -> bool {
        matches!(self, TextFormat::Number | TextFormat::Decimal)
    }
}

/// Arguments, descriptions and keys of a key-bearing field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldInputs {
    /// Bracketed arguments, e.g. the segments of a segmented control.
    pub arguments: Vec<String>,
    /// Human-readable labels, paired positionally with `keys`.
    pub descriptions: Vec<String>,
    /// Data keys under which the form stores answers.
    pub keys: Vec<String>,
}

/// One parsed form element, with only the attributes its type allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Label { text: String },
    Space,
    TextField { format: TextFormat, inputs: FieldInputs },
    Stepper(FieldInputs),
    Switch(FieldInputs),
    Slider(FieldInputs),
    SegmentedControl(FieldInputs),
}

/// A parsed configuration field plus its lazily derived column keys.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    kind: FieldKind,
    pub(crate) columns: OnceLock<Vec<String>>,
}

impl PartialEq for FieldDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for FieldDescriptor {}

impl From<FieldKind> for FieldDescriptor {
    fn from(kind: FieldKind) -> Self {
        Self {
            kind,
            columns: OnceLock::new(),
        }
    }
}

impl FieldDescriptor {
    /// Parse a single field line.
    pub fn parse(line: &str) -> Result<Self, ScoutError> {
        let mut segments = line.split(SEGMENT_DELIMITER);
        let head = segments.next().unwrap_or_default();
        let (label, arguments) = split_arguments(head);
        let field_type = label.parse::<FieldType>()?;

        // The registry's shape rules decide which segments must follow.
        let descriptions = if field_type.has_descriptions() {
            segments
                .next()
                .ok_or_else(|| malformed(field_type, "missing description segment"))?
        } else {
            ""
        };
        let keys = if field_type.has_keys() {
            let keys = segments
                .next()
                .map(split_list)
                .ok_or_else(|| malformed(field_type, "missing key segment"))?;
            if keys.is_empty() {
                return Err(malformed(field_type, "key segment is empty"));
            }
            keys
        } else {
            Vec::new()
        };

        let inputs = FieldInputs {
            arguments,
            descriptions: split_list(descriptions),
            keys,
        };
        let kind = match field_type {
            FieldType::Space => FieldKind::Space,
            FieldType::Label => FieldKind::Label {
                text: descriptions.trim().to_string(),
            },
            FieldType::TextField => FieldKind::TextField {
                format: TextFormat::from_argument(inputs.arguments.first().map(String::as_str)),
                inputs,
            },
            FieldType::Stepper => FieldKind::Stepper(inputs),
            FieldType::Switch => FieldKind::Switch(inputs),
            FieldType::Slider => FieldKind::Slider(inputs),
            FieldType::SegmentedControl => FieldKind::SegmentedControl(inputs),
        };

        Ok(kind.into())
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn field_type(&self) -> FieldType {
        match &self.kind {
            FieldKind::Label { .. } => FieldType::Label,
            FieldKind::Space => FieldType::Space,
            FieldKind::TextField { .. } => FieldType::TextField,
            FieldKind::Stepper(_) => FieldType::Stepper,
            FieldKind::Switch(_) => FieldType::Switch,
            FieldKind::Slider(_) => FieldType::Slider,
            FieldKind::SegmentedControl(_) => FieldType::SegmentedControl,
        }
    }

    /// Inputs of a key-bearing field; `None` for labels and spaces.
    pub fn inputs(&self) -> Option<&FieldInputs> {
        match &self.kind {
            FieldKind::Label { .. } | FieldKind::Space => None,
            FieldKind::TextField { inputs, .. }
            | FieldKind::Stepper(inputs)
            | FieldKind::Switch(inputs)
            | FieldKind::Slider(inputs)
            | FieldKind::SegmentedControl(inputs) => Some(inputs),
        }
    }

    pub fn arguments(&self) -> &[String] {
        self.inputs()
            .map(|i| i.arguments.as_slice())
            .unwrap_or_default()
    }

    /// Descriptions; a label's text is its single description.
    pub fn descriptions(&self) -> &[String] {
        match &self.kind {
            FieldKind::Label { text } => std::slice::from_ref(text),
            _ => self
                .inputs()
                .map(|i| i.descriptions.as_slice())
                .unwrap_or_default(),
        }
    }

    pub fn keys(&self) -> &[String] {
        self.inputs()
            .map(|i| i.keys.as_slice())
            .unwrap_or_default()
    }
}

impl FromStr for FieldDescriptor {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldDescriptor::parse(s)
    }
}

fn malformed(field_type: FieldType, reason: &str) -> ScoutError {
    ScoutError::MalformedLine {
        field_type: field_type.to_string(),
        reason: reason.to_string(),
    }
}

/// Split the first `<...>` group out of a type segment.
///
/// Returns the trimmed residual label and the trimmed argument tokens.
pub(crate) fn split_arguments(segment: &str) -> (String, Vec<String>) {
    if let Some(open) = segment.find('<') {
        if let Some(len) = segment[open + 1..].find('>') {
            let close = open + 1 + len;
            let arguments = split_list(&segment[open + 1..close]);
            let label = format!("{}{}", &segment[..open], &segment[close + 1..]);
            return (label.trim().to_string(), arguments);
        }
    }
    (segment.trim().to_string(), Vec::new())
}

/// Comma-separated list with each token trimmed; blank tokens are dropped.
fn split_list(segment: &str) -> Vec<String> {
    segment
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive_and_trimmed() {
        assert_eq!(FieldType::lookup("switch"), Some(FieldType::Switch));
        assert_eq!(FieldType::lookup("  TextField "), Some(FieldType::TextField));
        assert_eq!(
            FieldType::lookup("segmented_control"),
            Some(FieldType::SegmentedControl)
        );
        assert_eq!(FieldType::lookup("segmented control"), None);
        assert_eq!(FieldType::lookup("DIAL"), None);
    }

    #[test]
    fn shape_rules_per_type() {
        let keyed: Vec<FieldType> = FieldType::ALL.into_iter().filter(FieldType::has_keys).collect();
        assert_eq!(
            keyed,
            vec![
                FieldType::TextField,
                FieldType::Stepper,
                FieldType::Switch,
                FieldType::Slider,
                FieldType::SegmentedControl,
            ]
        );
        assert!(FieldType::Label.has_descriptions());
        assert!(!FieldType::Space.has_descriptions());
        assert!(FieldType::SegmentedControl.uses_arguments());
        assert!(!FieldType::Stepper.uses_arguments());
    }

    #[test]
    fn shape_rules_govern_parsing() {
        // SPACE takes no segments, so anything after it is ignored
        assert_eq!(
            FieldDescriptor::parse("SPACE ;; ignored ;; also").unwrap().kind(),
            &FieldKind::Space
        );
        // LABEL takes descriptions but no keys
        let label = FieldDescriptor::parse("LABEL ;; Teleop ;; stray").unwrap();
        assert!(label.keys().is_empty());
        assert_eq!(
            FieldDescriptor::parse("LABEL"),
            Err(ScoutError::MalformedLine {
                field_type: "LABEL".into(),
                reason: "missing description segment".into(),
            })
        );
        assert_eq!(
            FieldDescriptor::parse("STEPPER ;; Cycles"),
            Err(ScoutError::MalformedLine {
                field_type: "STEPPER".into(),
                reason: "missing key segment".into(),
            })
        );
    }

    #[test]
    fn display_round_trips_through_lookup() {
        for t in FieldType::ALL {
            assert_eq!(FieldType::lookup(&t.to_string()), Some(t));
        }
    }

    #[test]
    fn parse_switch_line() {
        let field = FieldDescriptor::parse("SWITCH ;; Climbed,Parked ;; climbed,parked").unwrap();
        assert_eq!(field.field_type(), FieldType::Switch);
        assert_eq!(field.descriptions(), ["Climbed", "Parked"]);
        assert_eq!(field.keys(), ["climbed", "parked"]);
        assert!(field.arguments().is_empty());
    }

    #[test]
    fn parse_textfield_with_argument() {
        let field = FieldDescriptor::parse("TEXTFIELD<number> ;; Auto Points ;; auto_points").unwrap();
        assert_eq!(field.arguments(), ["number"]);
        assert!(matches!(
            field.kind(),
            FieldKind::TextField {
                format: TextFormat::Number,
                ..
            }
        ));

        let text = FieldDescriptor::parse("TEXTFIELD< TEXT > ;; Comments ;; comments").unwrap();
        assert!(matches!(
            text.kind(),
            FieldKind::TextField {
                format: TextFormat::Text,
                ..
            }
        ));
    }

    #[test]
    fn parse_segmented_control_arguments_trimmed() {
        let field =
            FieldDescriptor::parse("SEGMENTED_CONTROL< Low , High ,None> ;; Goal ;; goal").unwrap();
        assert_eq!(field.arguments(), ["Low", "High", "None"]);
        assert_eq!(field.keys(), ["goal"]);
    }

    #[test]
    fn parse_label_and_space() {
        let label = FieldDescriptor::parse("LABEL ;;  Autonomous  ").unwrap();
        assert_eq!(label.field_type(), FieldType::Label);
        assert_eq!(label.descriptions(), ["Autonomous"]);
        assert!(label.keys().is_empty());

        let space = FieldDescriptor::parse("SPACE").unwrap();
        assert_eq!(space.kind(), &FieldKind::Space);
        assert!(space.descriptions().is_empty());
    }

    #[test]
    fn unrecognized_type_is_reported() {
        let err = FieldDescriptor::parse("DIAL<1,2> ;; Dial ;; dial").unwrap_err();
        assert_eq!(err, ScoutError::UnrecognizedFieldType("DIAL".into()));
    }

    #[test]
    fn missing_segments_are_malformed() {
        assert!(matches!(
            FieldDescriptor::parse("STEPPER ;; Cycles"),
            Err(ScoutError::MalformedLine { .. })
        ));
        assert!(matches!(
            FieldDescriptor::parse("SWITCH"),
            Err(ScoutError::MalformedLine { .. })
        ));
        assert!(matches!(
            FieldDescriptor::parse("LABEL"),
            Err(ScoutError::MalformedLine { .. })
        ));
        assert!(matches!(
            FieldDescriptor::parse("SLIDER ;; Speed ;;  "),
            Err(ScoutError::MalformedLine { .. })
        ));
    }

    #[test]
    fn parse_is_deterministic() {
        let line = "SEGMENTED_CONTROL<a,b> ;; Pick ;; pick";
        assert_eq!(
            FieldDescriptor::parse(line).unwrap(),
            FieldDescriptor::parse(line).unwrap()
        );
    }

    #[test]
    fn unterminated_bracket_is_part_of_label() {
        let (label, args) = split_arguments("SLIDER<1,5");
        assert_eq!(label, "SLIDER<1,5");
        assert!(args.is_empty());
    }
}
