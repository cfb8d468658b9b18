//! Architecture projects (`projetos`).

use serde::{Deserialize, Serialize};

use super::entity::EntitySchema;
use super::validation::{ViolationCode, Violations};

/// Building typology of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Typology {
    /// Housing.
    Residencial,
    /// Shops and offices.
    Comercial,
    /// Public or institutional buildings.
    Institucional,
    /// Mixed use.
    Mista,
}

impl Typology {
    /// Every accepted typology.
    pub const ALL: [Self; 4] = [
        Self::Residencial,
        Self::Comercial,
        Self::Institucional,
        Self::Mista,
    ];

    /// Stored lowercase label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Residencial => "residencial",
            Self::Comercial => "comercial",
            Self::Institucional => "institucional",
            Self::Mista => "mista",
        }
    }

    /// Parse a label, ignoring case and surrounding whitespace.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Typology;
    ///
    /// assert_eq!(Typology::parse(" Comercial "), Some(Typology::Comercial));
    /// assert_eq!(Typology::parse("industrial"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_lowercase();
        Self::ALL.into_iter().find(|t| t.as_str() == wanted)
    }
}

/// Project payload as received; every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDraft {
    /// Project name.
    pub nome: Option<String>,
    /// Description.
    pub descricao: Option<String>,
    /// Person in charge.
    pub responsavel: Option<String>,
    /// Typology label, any case.
    pub tipologia: Option<String>,
    /// Notes for internal use.
    pub observacoes_internas: Option<String>,
}

/// Validated project fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFields {
    /// Project name, at most 200 characters.
    pub nome: String,
    /// Description.
    #[serde(default)]
    pub descricao: Option<String>,
    /// Person in charge.
    #[serde(default)]
    pub responsavel: Option<String>,
    /// Typology.
    #[serde(default)]
    pub tipologia: Option<Typology>,
    /// Notes for internal use.
    #[serde(default)]
    pub observacoes_internas: Option<String>,
}

/// Schema marker for projects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectKind;

impl EntitySchema for ProjectKind {
    const COLLECTION: &'static str = "projetos";
    const LABEL: &'static str = "projeto";

    type Draft = ProjectDraft;
    type Fields = ProjectFields;

    fn validate(draft: ProjectDraft) -> Result<ProjectFields, Violations> {
        let mut violations = Violations::default();
        let nome = violations.required_text("nome", draft.nome, 200);
        let descricao = violations.optional_text("descricao", draft.descricao, 1000);
        let responsavel = violations.optional_text("responsavel", draft.responsavel, 200);
        let observacoes_internas =
            violations.optional_text("observacoes_internas", draft.observacoes_internas, 1000);
        let tipologia = draft
            .tipologia
            .filter(|raw| !raw.trim().is_empty())
            .and_then(|raw| {
                let parsed = Typology::parse(&raw);
                if parsed.is_none() {
                    violations.push(
                        "tipologia",
                        ViolationCode::InvalidChoice,
                        "tipologia deve ser residencial, comercial, institucional ou mista",
                    );
                }
                parsed
            });

        match nome {
            Some(nome) if violations.is_empty() => Ok(ProjectFields {
                nome,
                descricao,
                responsavel,
                tipologia,
                observacoes_internas,
            }),
            _ => Err(violations),
        }
    }

    fn to_draft(fields: &ProjectFields) -> ProjectDraft {
        ProjectDraft {
            nome: Some(fields.nome.clone()),
            descricao: fields.descricao.clone(),
            responsavel: fields.responsavel.clone(),
            tipologia: fields.tipologia.map(|t| t.as_str().to_owned()),
            observacoes_internas: fields.observacoes_internas.clone(),
        }
    }

    fn merge(base: ProjectDraft, patch: ProjectDraft) -> ProjectDraft {
        ProjectDraft {
            nome: patch.nome.or(base.nome),
            descricao: patch.descricao.or(base.descricao),
            responsavel: patch.responsavel.or(base.responsavel),
            tipologia: patch.tipologia.or(base.tipologia),
            observacoes_internas: patch.observacoes_internas.or(base.observacoes_internas),
        }
    }
}
