//! Validation rules for land parcels.

use super::*;
use crate::domain::validation::ViolationCode;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn draft() -> ParcelDraft {
    ParcelDraft {
        matricula: Some("MAT-12345".to_owned()),
        data: Some("2024-05-10".to_owned()),
        municipio: Some("São Paulo".to_owned()),
        estado: Some("sp".to_owned()),
        pais: None,
        bairro: Some("Pinheiros".to_owned()),
        logradouro: Some("Rua dos Pinheiros".to_owned()),
        numero: Some("1000".to_owned()),
        cep: Some("05422-001".to_owned()),
        lados_poligono: Some(4),
        angulos_internos: Some(vec![90.0, 90.0, 90.0, 90.0]),
        tipo_lote: Some("esquina".to_owned()),
        area: Some(360.5),
        norte_verdadeiro: Some(12.25),
        zona: Some("zc1".to_owned()),
        observacoes: None,
    }
}

fn rejected(draft: ParcelDraft) -> Vec<(&'static str, ViolationCode)> {
    ParcelKind::validate(draft)
        .expect_err("draft should be rejected")
        .as_slice()
        .iter()
        .map(|v| (v.field, v.code))
        .collect()
}

#[rstest]
fn validate_normalises_stored_values(draft: ParcelDraft) {
    let fields = ParcelKind::validate(draft).expect("valid parcel");
    assert_eq!(fields.estado, "SP");
    assert_eq!(fields.pais, DEFAULT_COUNTRY);
    assert_eq!(fields.cep, "05422001");
    assert_eq!(fields.tipo_lote, LotType::Corner);
    assert_eq!(fields.zona, "ZC1");
    assert_eq!(fields.data, NaiveDate::from_ymd_opt(2024, 5, 10).expect("valid date"));
}

#[rstest]
fn missing_area_is_rejected(mut draft: ParcelDraft) {
    draft.area = None;
    assert_eq!(rejected(draft), vec![("area", ViolationCode::Missing)]);
}

#[rstest]
#[case(0.0)]
#[case(-5.0)]
#[case(f64::INFINITY)]
fn non_positive_area_is_rejected(mut draft: ParcelDraft, #[case] area: f64) {
    draft.area = Some(area);
    assert_eq!(rejected(draft), vec![("area", ViolationCode::OutOfRange)]);
}

#[rstest]
#[case(360.0, ViolationCode::OutOfRange)]
#[case(-0.5, ViolationCode::OutOfRange)]
#[case(12.345, ViolationCode::InvalidFormat)]
fn bearing_must_be_in_range_with_two_decimals(
    mut draft: ParcelDraft,
    #[case] bearing: f64,
    #[case] code: ViolationCode,
) {
    draft.norte_verdadeiro = Some(bearing);
    assert_eq!(rejected(draft), vec![("norte_verdadeiro", code)]);
}

#[rstest]
#[case(2)]
#[case(11)]
#[case(-3)]
fn sides_must_be_between_three_and_ten(mut draft: ParcelDraft, #[case] sides: i64) {
    draft.lados_poligono = Some(sides);
    draft.angulos_internos = None;
    assert_eq!(rejected(draft), vec![("lados_poligono", ViolationCode::OutOfRange)]);
}

#[rstest]
fn angle_count_must_match_sides(mut draft: ParcelDraft) {
    draft.angulos_internos = Some(vec![60.0, 60.0, 60.0]);
    assert_eq!(rejected(draft), vec![("angulos_internos", ViolationCode::Mismatch)]);
}

#[rstest]
fn angles_must_be_strictly_between_zero_and_180(mut draft: ParcelDraft) {
    draft.angulos_internos = Some(vec![90.0, 180.0, 45.0, 45.0]);
    assert_eq!(rejected(draft), vec![("angulos_internos", ViolationCode::OutOfRange)]);
}

#[rstest]
#[case("estado", "S1", ViolationCode::InvalidFormat)]
#[case("cep", "1234-567", ViolationCode::InvalidFormat)]
#[case("zona", "ZX9", ViolationCode::InvalidChoice)]
#[case("tipo_lote", "Lateral", ViolationCode::InvalidChoice)]
#[case("data", "10/05/2024", ViolationCode::InvalidFormat)]
fn malformed_text_fields_are_rejected(
    mut draft: ParcelDraft,
    #[case] field: &'static str,
    #[case] value: &str,
    #[case] code: ViolationCode,
) {
    let value = Some(value.to_owned());
    match field {
        "estado" => draft.estado = value,
        "cep" => draft.cep = value,
        "zona" => draft.zona = value,
        "tipo_lote" => draft.tipo_lote = value,
        _ => draft.data = value,
    }
    assert_eq!(rejected(draft), vec![(field, code)]);
}

#[rstest]
fn empty_draft_reports_all_required_fields() {
    let fields: Vec<_> = rejected(ParcelDraft::default())
        .into_iter()
        .map(|(field, _)| field)
        .collect();
    assert_eq!(
        fields,
        vec![
            "matricula",
            "data",
            "municipio",
            "estado",
            "bairro",
            "logradouro",
            "numero",
            "cep",
            "lados_poligono",
            "tipo_lote",
            "area",
            "norte_verdadeiro",
            "zona",
        ]
    );
}

#[rstest]
fn merge_keeps_stored_values_for_absent_fields(draft: ParcelDraft) {
    let patch = ParcelDraft {
        area: Some(500.0),
        ..ParcelDraft::default()
    };
    let merged = ParcelKind::merge(draft.clone(), patch);
    assert_eq!(merged.area, Some(500.0));
    assert_eq!(merged.matricula, draft.matricula);
    assert_eq!(merged.angulos_internos, draft.angulos_internos);
}

#[rstest]
fn form_text_numbers_are_accepted() {
    let draft: ParcelDraft = serde_json::from_value(json!({
        "lados_poligono": "4",
        "area": "360,5",
        "norte_verdadeiro": " 12.25 ",
        "angulos_internos": "90; 90;90 ;90",
        "observacoes": "",
    }))
    .expect("form payload deserialises");
    assert_eq!(draft.lados_poligono, Some(4));
    assert_eq!(draft.area, Some(360.5));
    assert_eq!(draft.norte_verdadeiro, Some(12.25));
    assert_eq!(draft.angulos_internos, Some(vec![90.0; 4]));
}

#[rstest]
fn blank_form_numbers_are_absent() {
    let draft: ParcelDraft =
        serde_json::from_value(json!({ "area": "", "angulos_internos": "" }))
            .expect("blank values deserialise");
    assert!(draft.area.is_none());
    assert_eq!(draft.angulos_internos, Some(Vec::new()));
}

#[rstest]
fn wrongly_typed_numbers_fail_to_deserialise() {
    let result = serde_json::from_value::<ParcelDraft>(json!({ "area": true }));
    assert!(result.is_err());
    let result = serde_json::from_value::<ParcelDraft>(json!({ "area": "muito" }));
    assert!(result.is_err());
}

#[rstest]
fn stored_lot_type_uses_canonical_label(draft: ParcelDraft) {
    let fields = ParcelKind::validate(draft).expect("valid parcel");
    let value = serde_json::to_value(&fields).expect("serialise fields");
    assert_eq!(value["tipo_lote"], "Esquina");
    assert_eq!(value["data"], "2024-05-10");
}
