//! List filters accepted by the collection endpoints.
//!
//! Query values go through the same normalisation the schemas apply before
//! storing, so `?zona=zc1` finds records stored as `ZC1`. A `search` term
//! matches when any of the entity's text fields contains it.

use serde::Deserialize;
use serde_json::Value;

use super::parcel::{LotType, normalise_zone};
use super::project::Typology;
use super::query::Filter;

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

const PROJECT_SEARCH_FIELDS: &[&str] = &["nome", "descricao"];
const PARCEL_SEARCH_FIELDS: &[&str] = &["matricula", "municipio", "bairro", "logradouro"];

fn text(value: &str) -> Value {
    Value::String(value.to_owned())
}

/// Filters for `GET /projetos`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectQuery {
    /// Free text matched against name and description.
    pub search: Option<String>,
    /// Case-insensitive substring of the project name.
    pub nome: Option<String>,
    /// Exact responsible party.
    pub responsavel: Option<String>,
    /// Typology, in any case.
    pub tipologia: Option<String>,
}

impl ProjectQuery {
    /// Build the store filter. Blank values are ignored.
    pub fn to_filter(&self) -> Filter {
        let mut filter = Filter::new();
        if let Some(term) = present(self.search.as_deref()) {
            filter = filter.contains_any(PROJECT_SEARCH_FIELDS, term);
        }
        if let Some(nome) = present(self.nome.as_deref()) {
            filter = filter.contains("nome", nome);
        }
        if let Some(responsavel) = present(self.responsavel.as_deref()) {
            filter = filter.equals("responsavel", text(responsavel));
        }
        if let Some(tipologia) = present(self.tipologia.as_deref()) {
            let value = Typology::parse(tipologia)
                .map_or_else(|| tipologia.to_lowercase(), |t| t.as_str().to_owned());
            filter = filter.equals("tipologia", Value::String(value));
        }
        filter
    }
}

/// Filters for `GET /formulario-terrenos-projetos`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParcelQuery {
    /// Free text matched against registration, municipality, neighbourhood
    /// and street.
    pub search: Option<String>,
    /// Exact municipality.
    pub municipio: Option<String>,
    /// State code, in any case.
    pub estado: Option<String>,
    /// Exact neighbourhood.
    pub bairro: Option<String>,
    /// Lot type label or variant name, in any case.
    pub tipo_lote: Option<String>,
    /// Zone code, in any case.
    pub zona: Option<String>,
    /// Case-insensitive substring of the registration number.
    pub matricula: Option<String>,
    /// Inclusive lower area bound in m².
    pub area_min: Option<f64>,
    /// Inclusive upper area bound in m².
    pub area_max: Option<f64>,
}

impl ParcelQuery {
    /// Build the store filter. Blank values are ignored; unknown lot types
    /// and zones are kept verbatim so they simply match nothing.
    pub fn to_filter(&self) -> Filter {
        let mut filter = Filter::new();
        if let Some(term) = present(self.search.as_deref()) {
            filter = filter.contains_any(PARCEL_SEARCH_FIELDS, term);
        }
        if let Some(municipio) = present(self.municipio.as_deref()) {
            filter = filter.equals("municipio", text(municipio));
        }
        if let Some(estado) = present(self.estado.as_deref()) {
            filter = filter.equals("estado", Value::String(estado.to_uppercase()));
        }
        if let Some(bairro) = present(self.bairro.as_deref()) {
            filter = filter.equals("bairro", text(bairro));
        }
        if let Some(tipo) = present(self.tipo_lote.as_deref()) {
            let label = LotType::parse(tipo).map_or(tipo, |lot| lot.label());
            filter = filter.equals("tipo_lote", text(label));
        }
        if let Some(zona) = present(self.zona.as_deref()) {
            let zone = normalise_zone(zona).map_or_else(|| zona.to_uppercase(), str::to_owned);
            filter = filter.equals("zona", Value::String(zone));
        }
        if let Some(matricula) = present(self.matricula.as_deref()) {
            filter = filter.contains("matricula", matricula);
        }
        filter.range("area", self.area_min, self.area_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Document;
    use rstest::rstest;
    use serde_json::json;

    fn document(value: Value) -> Document {
        value.as_object().cloned().unwrap_or_default()
    }

    #[rstest]
    fn blank_values_add_no_conditions() {
        let query = ParcelQuery {
            municipio: Some("  ".to_owned()),
            zona: Some(String::new()),
            search: Some(" ".to_owned()),
            ..ParcelQuery::default()
        };
        assert!(query.to_filter().is_empty());
        assert!(ProjectQuery::default().to_filter().is_empty());
    }

    #[rstest]
    #[case(json!({"zona": "zc1"}), true)]
    #[case(json!({"estado": "sp"}), true)]
    #[case(json!({"tipo_lote": "esquina"}), true)]
    #[case(json!({"matricula": "00-1"}), true)]
    #[case(json!({"area_min": 100.0, "area_max": 300.0}), true)]
    #[case(json!({"area_min": 300.0}), false)]
    #[case(json!({"zona": "zc2"}), false)]
    #[case(json!({"municipio": "campinas"}), false)]
    #[case(json!({"search": "quirino"}), true)]
    #[case(json!({"search": "CAMBUÍ"}), true)]
    #[case(json!({"search": "mat-00"}), true)]
    #[case(json!({"search": "campinas", "zona": "zc1"}), true)]
    #[case(json!({"search": "campinas", "zona": "zc2"}), false)]
    #[case(json!({"search": "santos"}), false)]
    fn parcel_filters_normalise_like_stored_values(#[case] raw: Value, #[case] expected: bool) {
        let stored = document(json!({
            "matricula": "MAT-00-12",
            "municipio": "Campinas",
            "estado": "SP",
            "tipo_lote": "Esquina",
            "zona": "ZC1",
            "bairro": "Cambuí",
            "logradouro": "Rua Coronel Quirino",
            "area": 250.0,
        }));
        let query: ParcelQuery = serde_json::from_value(raw).expect("query deserialises");
        assert_eq!(query.to_filter().matches(&stored), expected);
    }

    #[rstest]
    fn project_filters_match_name_fragment_and_typology() {
        let stored = document(json!({
            "nome": "Escola Municipal",
            "responsavel": "Ana",
            "tipologia": "institucional",
        }));
        let query = ProjectQuery {
            nome: Some("municipal".to_owned()),
            responsavel: Some("Ana".to_owned()),
            tipologia: Some("INSTITUCIONAL".to_owned()),
            ..ProjectQuery::default()
        };
        assert!(query.to_filter().matches(&stored));

        let other = ProjectQuery {
            tipologia: Some("mista".to_owned()),
            ..ProjectQuery::default()
        };
        assert!(!other.to_filter().matches(&stored));
    }

    #[rstest]
    #[case("escola", true)]
    #[case("REFORMA", true)]
    #[case("ginásio", false)]
    fn project_search_covers_name_and_description(#[case] term: &str, #[case] expected: bool) {
        let stored = document(json!({
            "nome": "Escola Municipal",
            "descricao": "Reforma do bloco B",
        }));
        let query = ProjectQuery {
            search: Some(term.to_owned()),
            ..ProjectQuery::default()
        };
        assert_eq!(query.to_filter().matches(&stored), expected);
    }
}
