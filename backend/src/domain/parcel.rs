//! Land parcels registered through the parcel form
//! (`formulario_terrenos_projetos`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::entity::EntitySchema;
use super::validation::{ViolationCode, Violations};

/// Municipal zoning codes accepted for `zona`.
pub const ZONES: [&str; 18] = [
    "ZAD1", "ZAD2", "ZC1", "ZC2", "ZCT1", "ZCT2", "ZCT3", "ZCT4", "ZEIS", "ZH1", "ZH2", "ZH3",
    "ZHL", "ZI1", "ZI2", "ZIA1", "ZIA2", "ZII",
];

/// Country stored when the form leaves `pais` blank.
pub const DEFAULT_COUNTRY: &str = "BRASIL";

/// Position of the lot within its block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum LotType {
    #[serde(rename = "Padrão")]
    Standard,
    #[serde(rename = "Esquina")]
    Corner,
    #[serde(rename = "Fundos")]
    Rear,
    #[serde(rename = "Meio")]
    Middle,
    #[serde(rename = "Esquina Divisa")]
    CornerBoundary,
    #[serde(rename = "Único na Quadra")]
    WholeBlock,
    #[serde(rename = "Outro")]
    Other,
}

impl LotType {
    /// Every accepted lot type, in form order.
    pub const ALL: [Self; 7] = [
        Self::Standard,
        Self::Corner,
        Self::Rear,
        Self::Middle,
        Self::CornerBoundary,
        Self::WholeBlock,
        Self::Other,
    ];

    /// Canonical stored label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Padrão",
            Self::Corner => "Esquina",
            Self::Rear => "Fundos",
            Self::Middle => "Meio",
            Self::CornerBoundary => "Esquina Divisa",
            Self::WholeBlock => "Único na Quadra",
            Self::Other => "Outro",
        }
    }

    /// Parse a label, ignoring case and surrounding whitespace.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::LotType;
    ///
    /// assert_eq!(LotType::parse("único na quadra"), Some(LotType::WholeBlock));
    /// assert_eq!(LotType::parse("lateral"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|lot| lot.label().to_lowercase() == wanted)
    }
}

/// Normalise a zoning code; `None` when it is not a known zone.
pub fn normalise_zone(raw: &str) -> Option<&'static str> {
    let wanted = raw.trim().to_uppercase();
    ZONES.into_iter().find(|zone| *zone == wanted)
}

/// Parcel payload as received; every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParcelDraft {
    /// Land registry number.
    pub matricula: Option<String>,
    /// Survey date as `YYYY-MM-DD`.
    pub data: Option<String>,
    /// Municipality.
    pub municipio: Option<String>,
    /// Two-letter state code, any case.
    pub estado: Option<String>,
    /// Country; defaults to Brazil when blank.
    pub pais: Option<String>,
    /// Neighbourhood.
    pub bairro: Option<String>,
    /// Street.
    pub logradouro: Option<String>,
    /// Street number.
    pub numero: Option<String>,
    /// Postcode, with or without punctuation.
    pub cep: Option<String>,
    /// Number of polygon sides.
    #[serde(deserialize_with = "form_values::number")]
    pub lados_poligono: Option<i64>,
    /// Interior angles in degrees; forms send them `;`-separated.
    #[serde(deserialize_with = "form_values::number_list")]
    pub angulos_internos: Option<Vec<f64>>,
    /// Lot type label or variant name.
    pub tipo_lote: Option<String>,
    /// Area in m².
    #[serde(deserialize_with = "form_values::number")]
    pub area: Option<f64>,
    /// Bearing of true north in degrees.
    #[serde(deserialize_with = "form_values::number")]
    pub norte_verdadeiro: Option<f64>,
    /// Zoning code, any case.
    pub zona: Option<String>,
    /// Free-form notes.
    pub observacoes: Option<String>,
}

/// Numeric fields arrive as JSON numbers from API clients and as text from
/// HTML forms posted through the HTMX `json-enc` extension.
mod form_values {
    use std::str::FromStr;

    use serde::de::{Deserializer, Error};
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText<T> {
        Number(T),
        Text(String),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrText {
        List(Vec<f64>),
        Text(String),
    }

    fn parse_text<T: FromStr, E: Error>(raw: &str) -> Result<Option<T>, E> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed
            .replace(',', ".")
            .parse()
            .map(Some)
            .map_err(|_| E::custom(format!("invalid number: {trimmed}")))
    }

    pub(super) fn number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr + Deserialize<'de>,
    {
        match Option::<NumberOrText<T>>::deserialize(deserializer)? {
            None => Ok(None),
            Some(NumberOrText::Number(value)) => Ok(Some(value)),
            Some(NumberOrText::Text(raw)) => parse_text(&raw),
        }
    }

    pub(super) fn number_list<'de, D>(deserializer: D) -> Result<Option<Vec<f64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<ListOrText>::deserialize(deserializer)? {
            None => Ok(None),
            Some(ListOrText::List(values)) => Ok(Some(values)),
            Some(ListOrText::Text(raw)) => {
                let values = raw
                    .split(';')
                    .filter_map(|part| parse_text::<f64, D::Error>(part).transpose())
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Some(values))
            }
        }
    }
}

/// Validated parcel fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelFields {
    /// Land registry number, at most 50 characters.
    pub matricula: String,
    /// Survey date.
    pub data: NaiveDate,
    /// Municipality.
    pub municipio: String,
    /// Upper-case two-letter state code.
    pub estado: String,
    /// Country, [`DEFAULT_COUNTRY`] unless given.
    pub pais: String,
    /// Neighbourhood.
    pub bairro: String,
    /// Street.
    pub logradouro: String,
    /// Street number.
    pub numero: String,
    /// Postcode reduced to its eight digits.
    pub cep: String,
    /// Polygon sides, between 3 and 10.
    pub lados_poligono: u8,
    /// One interior angle per side, each strictly between 0 and 180 degrees.
    #[serde(default)]
    pub angulos_internos: Option<Vec<f64>>,
    /// Lot type.
    pub tipo_lote: LotType,
    /// Positive area in m².
    pub area: f64,
    /// Bearing of true north in `[0, 360)` with at most two decimals.
    pub norte_verdadeiro: f64,
    /// Canonical zone code from [`ZONES`].
    pub zona: String,
    /// Free-form notes.
    #[serde(default)]
    pub observacoes: Option<String>,
}

/// Schema marker for land parcels.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParcelKind;

impl EntitySchema for ParcelKind {
    const COLLECTION: &'static str = "formulario_terrenos_projetos";
    const LABEL: &'static str = "terreno";

    type Draft = ParcelDraft;
    type Fields = ParcelFields;

    fn validate(draft: ParcelDraft) -> Result<ParcelFields, Violations> {
        let mut v = Violations::default();
        let matricula = v.required_text("matricula", draft.matricula, 50);
        let data = v
            .required_text("data", draft.data, 10)
            .and_then(|raw| check_date(&mut v, &raw));
        let municipio = v.required_text("municipio", draft.municipio, 100);
        let estado = v
            .required_text("estado", draft.estado, 2)
            .and_then(|raw| check_state(&mut v, &raw));
        let pais = v
            .optional_text("pais", draft.pais, 50)
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_owned());
        let bairro = v.required_text("bairro", draft.bairro, 100);
        let logradouro = v.required_text("logradouro", draft.logradouro, 200);
        let numero = v.required_text("numero", draft.numero, 20);
        let cep = v
            .required_text("cep", draft.cep, 20)
            .and_then(|raw| check_postcode(&mut v, &raw));
        let lados_poligono = v
            .required("lados_poligono", draft.lados_poligono)
            .and_then(|sides| check_sides(&mut v, sides));
        let angulos_internos = draft
            .angulos_internos
            .and_then(|angles| check_angles(&mut v, angles, lados_poligono));
        let tipo_lote = v
            .required_text("tipo_lote", draft.tipo_lote, 50)
            .and_then(|raw| check_lot_type(&mut v, &raw));
        let area = v
            .required("area", draft.area)
            .and_then(|area| check_area(&mut v, area));
        let norte_verdadeiro = v
            .required("norte_verdadeiro", draft.norte_verdadeiro)
            .and_then(|bearing| check_bearing(&mut v, bearing));
        let zona = v
            .required_text("zona", draft.zona, 10)
            .and_then(|raw| check_zone(&mut v, &raw));
        let observacoes = v.optional_text("observacoes", draft.observacoes, 1000);

        let (
            Some(matricula),
            Some(data),
            Some(municipio),
            Some(estado),
            Some(bairro),
            Some(logradouro),
            Some(numero),
            Some(cep),
            Some(lados_poligono),
            Some(tipo_lote),
            Some(area),
            Some(norte_verdadeiro),
            Some(zona),
        ) = (
            matricula,
            data,
            municipio,
            estado,
            bairro,
            logradouro,
            numero,
            cep,
            lados_poligono,
            tipo_lote,
            area,
            norte_verdadeiro,
            zona,
        )
        else {
            return Err(v);
        };
        if !v.is_empty() {
            return Err(v);
        }

        Ok(ParcelFields {
            matricula,
            data,
            municipio,
            estado,
            pais,
            bairro,
            logradouro,
            numero,
            cep,
            lados_poligono,
            angulos_internos,
            tipo_lote,
            area,
            norte_verdadeiro,
            zona,
            observacoes,
        })
    }

    fn to_draft(fields: &ParcelFields) -> ParcelDraft {
        ParcelDraft {
            matricula: Some(fields.matricula.clone()),
            data: Some(fields.data.format("%Y-%m-%d").to_string()),
            municipio: Some(fields.municipio.clone()),
            estado: Some(fields.estado.clone()),
            pais: Some(fields.pais.clone()),
            bairro: Some(fields.bairro.clone()),
            logradouro: Some(fields.logradouro.clone()),
            numero: Some(fields.numero.clone()),
            cep: Some(fields.cep.clone()),
            lados_poligono: Some(i64::from(fields.lados_poligono)),
            angulos_internos: fields.angulos_internos.clone(),
            tipo_lote: Some(fields.tipo_lote.label().to_owned()),
            area: Some(fields.area),
            norte_verdadeiro: Some(fields.norte_verdadeiro),
            zona: Some(fields.zona.clone()),
            observacoes: fields.observacoes.clone(),
        }
    }

    fn merge(base: ParcelDraft, patch: ParcelDraft) -> ParcelDraft {
        ParcelDraft {
            matricula: patch.matricula.or(base.matricula),
            data: patch.data.or(base.data),
            municipio: patch.municipio.or(base.municipio),
            estado: patch.estado.or(base.estado),
            pais: patch.pais.or(base.pais),
            bairro: patch.bairro.or(base.bairro),
            logradouro: patch.logradouro.or(base.logradouro),
            numero: patch.numero.or(base.numero),
            cep: patch.cep.or(base.cep),
            lados_poligono: patch.lados_poligono.or(base.lados_poligono),
            angulos_internos: patch.angulos_internos.or(base.angulos_internos),
            tipo_lote: patch.tipo_lote.or(base.tipo_lote),
            area: patch.area.or(base.area),
            norte_verdadeiro: patch.norte_verdadeiro.or(base.norte_verdadeiro),
            zona: patch.zona.or(base.zona),
            observacoes: patch.observacoes.or(base.observacoes),
        }
    }
}

fn check_date(v: &mut Violations, raw: &str) -> Option<NaiveDate> {
    let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
    if parsed.is_none() {
        v.push("data", ViolationCode::InvalidFormat, "data deve estar no formato AAAA-MM-DD");
    }
    parsed
}

fn check_state(v: &mut Violations, raw: &str) -> Option<String> {
    if raw.len() == 2 && raw.chars().all(|c| c.is_ascii_alphabetic()) {
        return Some(raw.to_ascii_uppercase());
    }
    v.push("estado", ViolationCode::InvalidFormat, "estado deve ser a sigla de 2 letras");
    None
}

fn check_postcode(v: &mut Violations, raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 8 {
        return Some(digits);
    }
    v.push("cep", ViolationCode::InvalidFormat, "cep deve conter 8 dígitos");
    None
}

fn check_sides(v: &mut Violations, sides: i64) -> Option<u8> {
    match u8::try_from(sides) {
        Ok(sides @ 3..=10) => Some(sides),
        _ => {
            v.push(
                "lados_poligono",
                ViolationCode::OutOfRange,
                "lados_poligono deve estar entre 3 e 10",
            );
            None
        }
    }
}

fn check_angles(v: &mut Violations, angles: Vec<f64>, sides: Option<u8>) -> Option<Vec<f64>> {
    if angles.is_empty() {
        return None;
    }
    if sides.is_some_and(|sides| angles.len() != usize::from(sides)) {
        v.push(
            "angulos_internos",
            ViolationCode::Mismatch,
            "angulos_internos deve ter um ângulo por lado do polígono",
        );
        return None;
    }
    if angles
        .iter()
        .any(|angle| !angle.is_finite() || *angle <= 0.0 || *angle >= 180.0)
    {
        v.push(
            "angulos_internos",
            ViolationCode::OutOfRange,
            "cada ângulo interno deve estar entre 0 e 180 graus",
        );
        return None;
    }
    Some(angles)
}

fn check_lot_type(v: &mut Violations, raw: &str) -> Option<LotType> {
    let parsed = LotType::parse(raw);
    if parsed.is_none() {
        let accepted: Vec<&str> = LotType::ALL.iter().map(|lot| lot.label()).collect();
        v.push(
            "tipo_lote",
            ViolationCode::InvalidChoice,
            format!("tipo_lote deve ser um de: {}", accepted.join(", ")),
        );
    }
    parsed
}

fn check_area(v: &mut Violations, area: f64) -> Option<f64> {
    if area.is_finite() && area > 0.0 {
        return Some(area);
    }
    v.push("area", ViolationCode::OutOfRange, "area deve ser maior que zero");
    None
}

fn check_bearing(v: &mut Violations, bearing: f64) -> Option<f64> {
    if !bearing.is_finite() || !(0.0..360.0).contains(&bearing) {
        v.push(
            "norte_verdadeiro",
            ViolationCode::OutOfRange,
            "norte_verdadeiro deve estar entre 0 e 360 graus",
        );
        return None;
    }
    let hundredths = bearing * 100.0;
    if (hundredths - hundredths.round()).abs() > 1e-6 {
        v.push(
            "norte_verdadeiro",
            ViolationCode::InvalidFormat,
            "norte_verdadeiro aceita no máximo 2 casas decimais",
        );
        return None;
    }
    Some(bearing)
}

fn check_zone(v: &mut Violations, raw: &str) -> Option<String> {
    let zone = normalise_zone(raw);
    if zone.is_none() {
        v.push(
            "zona",
            ViolationCode::InvalidChoice,
            format!("zona deve ser uma de: {}", ZONES.join(", ")),
        );
    }
    zone.map(str::to_owned)
}

#[cfg(test)]
mod tests;
