use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub enum UploadStatus {
    Processing,
    Success,
    Error(String),
}

#[derive(Debug, Clone)]
pub struct FileStatus {
    pub name: String,
    pub status: UploadStatus,
}

/// A local file picked by the user. Only ever read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Self {
            name,
            path: path.to_path_buf(),
        }
    }
}

/// Outcome of one file's exchange with the endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadResult {
    /// `fields` is `None` when the body held neither response shape.
    Success {
        file_name: String,
        fields: Option<ExtractedFields>,
    },
    Failure {
        file_name: String,
        message: String,
    },
}

impl UploadResult {
    pub fn file_name(&self) -> &str {
        match self {
            UploadResult::Success { file_name, .. } | UploadResult::Failure { file_name, .. } => {
                file_name
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UploadResult::Success { .. })
    }
}

/// Invoice fields returned by the extraction service, kept as display strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExtractedFields {
    #[serde(default, deserialize_with = "opaque_string")]
    pub nome_emissor: Option<String>,
    #[serde(default, deserialize_with = "opaque_string")]
    pub endereco_emissor: Option<String>,
    #[serde(rename = "CNPJ_emissor", default, deserialize_with = "opaque_string")]
    pub cnpj_emissor: Option<String>,
    #[serde(
        rename = "CNPJ_CPF_consumidor",
        default,
        deserialize_with = "opaque_string"
    )]
    pub cnpj_cpf_consumidor: Option<String>,
    #[serde(default, deserialize_with = "opaque_string")]
    pub data_emissao: Option<String>,
    #[serde(default, deserialize_with = "opaque_string")]
    pub numero_nota_fiscal: Option<String>,
    #[serde(default, deserialize_with = "opaque_string")]
    pub serie_nota_fiscal: Option<String>,
    #[serde(default, deserialize_with = "opaque_string")]
    pub valor_total: Option<String>,
    #[serde(default, deserialize_with = "opaque_string")]
    pub forma_pgto: Option<String>,
}

/// Display label, value and absence placeholder of one field.
pub struct FieldEntry<'a> {
    pub label: &'static str,
    pub value: Option<&'a str>,
    pub placeholder: &'static str,
}

const NOT_AVAILABLE: &str = "Not available";

impl ExtractedFields {
    /// Fields in display order.
    pub fn entries(&self) -> [FieldEntry<'_>; 9] {
        [
            entry("Company", &self.nome_emissor, "Not provided"),
            entry("Issuer CNPJ", &self.cnpj_emissor, NOT_AVAILABLE),
            entry("Address", &self.endereco_emissor, NOT_AVAILABLE),
            entry("Consumer CPF/CNPJ", &self.cnpj_cpf_consumidor, NOT_AVAILABLE),
            entry("Issue date", &self.data_emissao, NOT_AVAILABLE),
            entry("Invoice number", &self.numero_nota_fiscal, NOT_AVAILABLE),
            entry("Invoice series", &self.serie_nota_fiscal, NOT_AVAILABLE),
            entry("Total value", &self.valor_total, NOT_AVAILABLE),
            entry("Payment method", &self.forma_pgto, NOT_AVAILABLE),
        ]
    }

    /// How many fields were returned (out of all of them).
    pub fn coverage(&self) -> (usize, usize) {
        let entries = self.entries();
        let filled = entries.iter().filter(|e| e.value.is_some()).count();
        (filled, entries.len())
    }
}

fn entry<'a>(
    label: &'static str,
    value: &'a Option<String>,
    placeholder: &'static str,
) -> FieldEntry<'a> {
    FieldEntry {
        label,
        value: value.as_deref(),
        placeholder,
    }
}

/// Accepts any JSON scalar as display text; `null` means absent.
fn opaque_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Response body of the extraction endpoint. Two shapes are seen in the
/// wild, so both are looked up in order.
#[derive(Debug, Deserialize)]
pub(crate) struct InvoiceResponse {
    #[serde(default)]
    response_from_aws: Option<Value>,
    #[serde(default)]
    text: Option<Value>,
}

impl InvoiceResponse {
    pub(crate) fn into_fields(self) -> Option<ExtractedFields> {
        let payload = match self.response_from_aws {
            Some(envelope) if !is_empty_value(&envelope) => match envelope {
                Value::Object(mut map) => map.remove("text"),
                // a scalar envelope has no `text` to read
                _ => None,
            },
            _ => self.text,
        }?;
        // a payload that is not an object carries no fields
        match payload {
            Value::Object(_) => serde_json::from_value(payload).ok(),
            _ => None,
        }
    }
}

/// `null`, `false`, zero and `""` count as a missing envelope.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Option<ExtractedFields> {
        serde_json::from_str::<InvoiceResponse>(body)
            .unwrap()
            .into_fields()
    }

    #[test]
    fn test_top_level_text_shape() {
        let fields = parse(r#"{"text": {"nome_emissor": "Acme"}}"#).unwrap();
        assert_eq!(fields.nome_emissor.as_deref(), Some("Acme"));
        assert_eq!(fields.valor_total, None);
    }

    #[test]
    fn test_nested_aws_shape_wins_when_present() {
        let fields = parse(
            r#"{"response_from_aws": {"text": {"valor_total": "100.00"}},
                "text": {"valor_total": "1.00"}}"#,
        )
        .unwrap();
        assert_eq!(fields.valor_total.as_deref(), Some("100.00"));
    }

    #[test]
    fn test_null_envelope_falls_back_to_text() {
        let fields =
            parse(r#"{"response_from_aws": null, "text": {"forma_pgto": "PIX"}}"#).unwrap();
        assert_eq!(fields.forma_pgto.as_deref(), Some("PIX"));
    }

    #[test]
    fn test_envelope_without_text_yields_nothing() {
        assert_eq!(parse(r#"{"response_from_aws": {}}"#), None);
        assert_eq!(parse(r#"{"unexpected": 1}"#), None);
        assert_eq!(parse(r#"{"text": "plain words"}"#), None);
    }

    #[test]
    fn test_falsy_envelope_falls_back_to_text() {
        for envelope in ["false", "0", r#""""#] {
            let body = format!(
                r#"{{"response_from_aws": {envelope}, "text": {{"nome_emissor": "Acme"}}}}"#
            );
            let fields = parse(&body).unwrap();
            assert_eq!(fields.nome_emissor.as_deref(), Some("Acme"), "envelope {envelope}");
        }
    }

    #[test]
    fn test_scalar_envelope_yields_no_fields() {
        for envelope in [r#""ok""#, "true", "7"] {
            let body = format!(
                r#"{{"response_from_aws": {envelope}, "text": {{"nome_emissor": "Acme"}}}}"#
            );
            assert_eq!(parse(&body), None, "envelope {envelope}");
        }
    }

    #[test]
    fn test_scalars_are_kept_as_display_text() {
        let fields = parse(
            r#"{"text": {"valor_total": 42.5, "serie_nota_fiscal": 1,
                         "CNPJ_emissor": "12.345.678/0001-90", "data_emissao": null,
                         "forma_pgto": "None"}}"#,
        )
        .unwrap();
        assert_eq!(fields.valor_total.as_deref(), Some("42.5"));
        assert_eq!(fields.serie_nota_fiscal.as_deref(), Some("1"));
        assert_eq!(fields.cnpj_emissor.as_deref(), Some("12.345.678/0001-90"));
        assert_eq!(fields.data_emissao, None);
        assert_eq!(fields.forma_pgto.as_deref(), Some("None"));
        assert_eq!(fields.coverage(), (4, 9));
    }

    #[test]
    fn test_selected_file_name_from_path() {
        let file = SelectedFile::from_path("/tmp/notas/nota-01.pdf");
        assert_eq!(file.name, "nota-01.pdf");
        assert_eq!(file.path, PathBuf::from("/tmp/notas/nota-01.pdf"));
    }
}
