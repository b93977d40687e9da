//! Case validation against the minimal schema
//!
//! Every rule is evaluated for every record; a failing rule never hides the
//! ones after it. Duplicate ids are a collection-level concern and are
//! tracked by [`DuplicateTracker`] across records in input order.

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

use crate::core::document::{
    display_text, field, has_field, identity_key, is_int_in, is_list, is_non_empty_text,
    is_one_of, is_record,
};
use crate::schema::loader::Schema;

/// Shown in place of a case id that is missing
pub const MISSING_ID: &str = "<no id>";

const DIFFICULTY: std::ops::RangeInclusive<i64> = 1..=5;
const TRIAGE: std::ops::RangeInclusive<i64> = 1..=4;
/// 0 < age < 120
const AGE: std::ops::RangeInclusive<i64> = 1..=119;
const SEX_CODES: [&str; 3] = ["M", "F", "O"];

const CORRECT_LISTS: [&str; 4] = [
    "requiredExams",
    "helpfulExams",
    "requiredTreatments",
    "criticalMistakes",
];

/// One structural non-conformance found in a case record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violation {
    message: String,
}

impl Violation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Check one case record against `schema`.
///
/// Returns every violation found, in rule order. Content problems are never
/// errors; an empty list means the record conforms.
pub fn validate_case(case: &Value, schema: &Schema) -> Vec<Violation> {
    let mut errs = Vec::new();

    if !is_record(case) {
        errs.push(Violation::new("case record must be an object"));
    }

    for key in schema.required() {
        if !has_field(case, key) {
            errs.push(Violation::new(format!("required field missing: {}", key)));
        }
    }

    if let Some(id) = field(case, "id") {
        if !is_non_empty_text(id) {
            errs.push(Violation::new("invalid id"));
        }
    }
    if let Some(difficulty) = field(case, "difficulty") {
        if !is_int_in(difficulty, DIFFICULTY) {
            errs.push(Violation::new("difficulty must be an integer 1..5"));
        }
    }
    if let Some(triage) = field(case, "triage") {
        if !is_int_in(triage, TRIAGE) {
            errs.push(Violation::new("triage must be an integer 1..4"));
        }
    }

    check_patient(case, schema, &mut errs);

    for key in ["history", "physicalFindings"] {
        if let Some(value) = field(case, key) {
            if !is_list(value) {
                errs.push(Violation::new(format!("{} must be a list", key)));
            }
        }
    }
    if let Some(vitals) = field(case, "vitalsInitial") {
        if !is_record(vitals) {
            errs.push(Violation::new("vitalsInitial must be an object"));
        }
    }

    check_correct(case, &mut errs);
    check_education(case, &mut errs);

    errs
}

// The blanket "must be an object" violations below fire even when the
// required-field check already reported the same field as missing.

fn check_patient(case: &Value, schema: &Schema, errs: &mut Vec<Violation>) {
    let patient = match field(case, "patient") {
        Some(p) if is_record(p) => p,
        _ => {
            errs.push(Violation::new("patient must be an object"));
            return;
        }
    };

    for key in schema.patient_required() {
        if !has_field(patient, key) {
            errs.push(Violation::new(format!("patient.{} is required", key)));
        }
    }
    if let Some(age) = field(patient, "age") {
        if !is_int_in(age, AGE) {
            errs.push(Violation::new("invalid patient.age"));
        }
    }
    if let Some(sex) = field(patient, "sex") {
        if !is_one_of(sex, &SEX_CODES) {
            errs.push(Violation::new("patient.sex must be M/F/O"));
        }
    }
}

fn check_correct(case: &Value, errs: &mut Vec<Violation>) {
    let correct = match field(case, "correct") {
        Some(c) if is_record(c) => c,
        _ => {
            errs.push(Violation::new("correct must be an object"));
            return;
        }
    };

    if !field(correct, "diagnosis").map_or(false, is_non_empty_text) {
        errs.push(Violation::new("correct.diagnosis is required"));
    }
    for key in CORRECT_LISTS {
        if let Some(value) = field(correct, key) {
            if !is_list(value) {
                errs.push(Violation::new(format!("correct.{} must be a list", key)));
            }
        }
    }
}

fn check_education(case: &Value, errs: &mut Vec<Violation>) {
    let education = match field(case, "education") {
        Some(e) if is_record(e) => e,
        _ => {
            errs.push(Violation::new("education must be an object"));
            return;
        }
    };

    if !field(education, "summary").map_or(false, is_non_empty_text) {
        errs.push(Violation::new("education.summary is required"));
    }
    if let Some(key_points) = field(education, "keyPoints") {
        if !is_list(key_points) {
            errs.push(Violation::new("education.keyPoints must be a list"));
        }
    }
}

/// Display identifier of a case, falling back to [`MISSING_ID`]
pub fn display_id(case: &Value) -> String {
    field(case, "id").map_or_else(|| MISSING_ID.to_string(), display_text)
}

/// Ids seen so far in one pass over a collection
#[derive(Debug, Default)]
pub struct DuplicateTracker {
    seen: HashSet<String>,
}

impl DuplicateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the case's display id. Returns a violation when it was already
    /// seen; the first occurrence is never flagged. Cases without an id share
    /// the [`MISSING_ID`] placeholder, so every id-less case after the first
    /// is a duplicate.
    pub fn check(&mut self, case: &Value) -> Option<Violation> {
        let placeholder = Value::String(MISSING_ID.to_string());
        let id = field(case, "id").unwrap_or(&placeholder);
        if self.seen.insert(identity_key(id)) {
            None
        } else {
            Some(Violation::new(format!("duplicate id: {}", display_text(id))))
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Outcome of checking one case in a collection
#[derive(Debug, Clone)]
pub struct CaseReport {
    /// Position in the collection (0-based)
    pub index: usize,
    pub id: String,
    pub duplicate: Option<Violation>,
    pub violations: Vec<Violation>,
}

/// Serialized as `{index, id, violations}` with the duplicate-id violation
/// folded in front of the content violations
impl Serialize for CaseReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let violations: Vec<&Violation> = self.all_violations().collect();
        let mut state = serializer.serialize_struct("CaseReport", 3)?;
        state.serialize_field("index", &self.index)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("violations", &violations)?;
        state.end()
    }
}

impl CaseReport {
    pub fn is_valid(&self) -> bool {
        self.duplicate.is_none() && self.violations.is_empty()
    }

    /// Duplicate-id violation (if any) followed by the content violations
    pub fn all_violations(&self) -> impl Iterator<Item = &Violation> {
        self.duplicate.iter().chain(self.violations.iter())
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len() + usize::from(self.duplicate.is_some())
    }
}

/// Sequential checker for a whole collection.
///
/// Feed cases in input order with [`CollectionValidator::check`]; it owns
/// the duplicate tracking for the run.
pub struct CollectionValidator<'a> {
    schema: &'a Schema,
    tracker: DuplicateTracker,
    next_index: usize,
}

impl<'a> CollectionValidator<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            tracker: DuplicateTracker::new(),
            next_index: 0,
        }
    }

    pub fn check(&mut self, case: &Value) -> CaseReport {
        let index = self.next_index;
        self.next_index += 1;

        CaseReport {
            index,
            id: display_id(case),
            duplicate: self.tracker.check(case),
            violations: validate_case(case, self.schema),
        }
    }
}

/// Check every case of a collection in order
pub fn validate_collection(cases: &[Value], schema: &Schema) -> Vec<CaseReport> {
    let mut validator = CollectionValidator::new(schema);
    cases.iter().map(|case| validator.check(case)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new(
            vec![
                "id".to_string(),
                "patient".to_string(),
                "correct".to_string(),
                "education".to_string(),
            ],
            vec!["age".to_string(), "sex".to_string()],
        )
    }

    fn messages(case: &Value) -> Vec<String> {
        validate_case(case, &schema())
            .iter()
            .map(|v| v.to_string())
            .collect()
    }

    fn valid_case(id: &str) -> Value {
        json!({
            "id": id,
            "patient": {"age": 30, "sex": "M"},
            "correct": {"diagnosis": "flu"},
            "education": {"summary": "info"}
        })
    }

    #[test]
    fn test_minimal_valid_case() {
        assert!(messages(&valid_case("c1")).is_empty());
    }

    #[test]
    fn test_fully_populated_valid_case() {
        let case = json!({
            "id": "case_infarto_01",
            "title": "Dor torácica típica",
            "difficulty": 1,
            "triage": 2,
            "patient": {"name": "Carlos A.", "age": 54, "sex": "M"},
            "history": ["Hipertensão."],
            "vitalsInitial": {"hr": 102, "spo2": 96, "temp": 36.8},
            "physicalFindings": ["Paciente ansioso."],
            "correct": {
                "diagnosis": "IAM com supra de ST",
                "requiredExams": ["ecg"],
                "helpfulExams": ["labs"],
                "requiredTreatments": ["aspirin"],
                "criticalMistakes": []
            },
            "education": {"summary": "Tempo é músculo.", "keyPoints": ["ECG em 10 min"]}
        });
        assert!(messages(&case).is_empty());
    }

    #[test]
    fn test_missing_patient_reports_both_violations() {
        let case = json!({
            "id": "c2",
            "correct": {"diagnosis": "x"},
            "education": {"summary": "y"}
        });
        insta::assert_debug_snapshot!(messages(&case), @r###"
        [
            "required field missing: patient",
            "patient must be an object",
        ]
        "###);
    }

    #[test]
    fn test_age_out_of_range() {
        let mut case = valid_case("c3");
        case["patient"]["age"] = json!(150);
        assert_eq!(messages(&case), vec!["invalid patient.age"]);
    }

    #[test]
    fn test_age_bounds() {
        let ages = [
            (json!(0), false),
            (json!(1), true),
            (json!(119), true),
            (json!(120), false),
            (json!(30.5), false),
        ];
        for (age, ok) in ages {
            let mut case = valid_case("c");
            case["patient"]["age"] = age.clone();
            assert_eq!(messages(&case).is_empty(), ok, "age {}", age);
        }
    }

    #[test]
    fn test_sex_codes() {
        let mut case = valid_case("c");
        case["patient"]["sex"] = json!("X");
        assert_eq!(messages(&case), vec!["patient.sex must be M/F/O"]);

        case["patient"]["sex"] = json!("O");
        assert!(messages(&case).is_empty());
    }

    #[test]
    fn test_missing_patient_fields() {
        let mut case = valid_case("c");
        case["patient"] = json!({"name": "Ana"});
        assert_eq!(
            messages(&case),
            vec!["patient.age is required", "patient.sex is required"]
        );
    }

    #[test]
    fn test_missing_required_field() {
        let mut case = valid_case("c");
        case.as_object_mut().unwrap().remove("id");
        assert!(messages(&case).contains(&"required field missing: id".to_string()));
    }

    #[test]
    fn test_invalid_scalars() {
        let mut case = valid_case("c");
        case["id"] = json!("  ");
        case["difficulty"] = json!(6);
        case["triage"] = json!("1");
        assert_eq!(
            messages(&case),
            vec![
                "invalid id",
                "difficulty must be an integer 1..5",
                "triage must be an integer 1..4",
            ]
        );
    }

    #[test]
    fn test_wrong_container_types() {
        let mut case = valid_case("c");
        case["history"] = json!("none");
        case["physicalFindings"] = json!({});
        case["vitalsInitial"] = json!([]);
        assert_eq!(
            messages(&case),
            vec![
                "history must be a list",
                "physicalFindings must be a list",
                "vitalsInitial must be an object",
            ]
        );
    }

    #[test]
    fn test_correct_and_education_rules() {
        let mut case = valid_case("c");
        case["correct"] = json!({"diagnosis": "", "requiredExams": "ecg", "criticalMistakes": 3});
        case["education"] = json!({"keyPoints": "one"});
        insta::assert_debug_snapshot!(messages(&case), @r###"
        [
            "correct.diagnosis is required",
            "correct.requiredExams must be a list",
            "correct.criticalMistakes must be a list",
            "education.summary is required",
            "education.keyPoints must be a list",
        ]
        "###);
    }

    #[test]
    fn test_blanket_violations_for_wrong_types() {
        let mut case = valid_case("c");
        case["patient"] = json!("Carlos");
        case["correct"] = json!(null);
        case["education"] = json!(["summary"]);
        assert_eq!(
            messages(&case),
            vec![
                "patient must be an object",
                "correct must be an object",
                "education must be an object",
            ]
        );
    }

    #[test]
    fn test_non_record_case() {
        let errs = messages(&json!("case_01"));
        assert_eq!(errs[0], "case record must be an object");
        assert!(errs.contains(&"required field missing: id".to_string()));
        assert!(errs.contains(&"patient must be an object".to_string()));
    }

    #[test]
    fn test_rules_do_not_short_circuit() {
        let errs = messages(&json!({"difficulty": 9}));
        assert_eq!(
            errs,
            vec![
                "required field missing: id",
                "required field missing: patient",
                "required field missing: correct",
                "required field missing: education",
                "difficulty must be an integer 1..5",
                "patient must be an object",
                "correct must be an object",
                "education must be an object",
            ]
        );
    }

    #[test]
    fn test_duplicate_ids_flag_later_occurrences() {
        // same id at positions 2, 5 and 9 (1-based)
        let cases: Vec<Value> = (1..=9)
            .map(|n| match n {
                2 | 5 | 9 => valid_case("dup"),
                n => valid_case(&format!("c{}", n)),
            })
            .collect();

        let reports = validate_collection(&cases, &schema());
        let flagged: Vec<usize> = reports
            .iter()
            .filter(|r| r.duplicate.is_some())
            .map(|r| r.index + 1)
            .collect();
        assert_eq!(flagged, vec![5, 9]);
        assert_eq!(
            reports[4].duplicate,
            Some(Violation::new("duplicate id: dup"))
        );
    }

    #[test]
    fn test_duplicate_pair() {
        let cases = vec![valid_case("dup1"), valid_case("dup1")];
        let reports = validate_collection(&cases, &schema());
        assert!(reports[0].is_valid());
        assert!(!reports[1].is_valid());
        assert_eq!(reports[1].violation_count(), 1);
        assert_eq!(
            reports[1].all_violations().next().map(|v| v.message()),
            Some("duplicate id: dup1")
        );
    }

    #[test]
    fn test_missing_ids_collide_on_placeholder() {
        let cases = vec![json!({"title": "a"}), json!({"title": "b"})];
        let schema = Schema::new(vec!["id".to_string()], vec![]);
        let reports = validate_collection(&cases, &schema);
        assert!(reports[0].duplicate.is_none());
        assert_eq!(
            reports[1].duplicate,
            Some(Violation::new(format!("duplicate id: {}", MISSING_ID)))
        );
    }

    #[test]
    fn test_report_serializes_duplicate_with_violations() {
        let cases = vec![valid_case("dup1"), valid_case("dup1")];
        let reports = validate_collection(&cases, &schema());
        assert_eq!(
            serde_json::to_value(&reports[1]).unwrap(),
            json!({"index": 1, "id": "dup1", "violations": ["duplicate id: dup1"]})
        );
    }

    #[test]
    fn test_tracker_keeps_types_apart() {
        let mut tracker = DuplicateTracker::new();
        assert!(tracker.check(&json!({"id": 7})).is_none());
        assert!(tracker.check(&json!({"id": "7"})).is_none());
        assert!(tracker.check(&json!({"id": 7})).is_some());
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_display_id() {
        assert_eq!(display_id(&json!({"id": "c1"})), "c1");
        assert_eq!(display_id(&json!({"id": 12})), "12");
        assert_eq!(display_id(&json!({})), MISSING_ID);
        assert_eq!(display_id(&json!([1])), MISSING_ID);
    }
}
