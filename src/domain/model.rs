use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Login credentials. The upstream only accepts the PascalCase keys
/// `Username` / `Password`; a camelCase body is answered with HTTP 400.
#[derive(Clone, Serialize, PartialEq, Eq)]
pub struct Credentials {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Bearer token returned by the login endpoint. Held only for the duration
/// of one login-then-fetch chain.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// First `len` characters, for diagnostics output.
    pub fn preview(&self, len: usize) -> String {
        let mut chars = self.0.chars();
        let head: String = chars.by_ref().take(len).collect();
        if chars.next().is_some() {
            format!("{}...", head)
        } else {
            head
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token(***)")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// One published service of the catalog. Values are passed through as the
/// upstream sends them; unknown keys are kept in `extra`.
///
/// Decoding is per field: a missing or `null` field takes its default, and a
/// field of the wrong JSON type also takes its default while the raw value
/// is kept in `extra` under its original key. One odd record never fails
/// the whole catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogEntry {
    pub id_servicio: i64,
    pub id_subsistema: i64,
    pub member_name: String,
    pub x_road_instance: String,
    pub member_class: String,
    pub member_code: String,
    pub subsystem_code: String,
    pub service_code: String,
    pub service_version: String,
    pub service_type: String,
    pub descripcion: String,
    /// Example response, as raw text.
    pub respuesta: String,
    /// Input parameters, as raw text.
    pub parametros: String,
    pub responsables: String,
    pub habilitado: bool,
    pub nombre_archivo_adjunto: String,
    pub endpoint_method: String,
    pub endpoint_path: String,
    pub url_documentacion: Option<String>,
    pub url_solicitud: Option<String>,
    pub texto_alternativo: String,
    pub extra: Map<String, Value>,
}

macro_rules! catalog_entry_fields {
    ($($field:ident => $key:literal),* $(,)?) => {
        impl<'de> Deserialize<'de> for CatalogEntry {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let mut fields: Map<String, Value> = Map::deserialize(deserializer)?;
                let mut entry = CatalogEntry::default();
                $( take_field(&mut fields, $key, &mut entry.$field); )*
                entry.extra = fields;
                Ok(entry)
            }
        }

        impl Serialize for CatalogEntry {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                let mut map = Map::new();
                $( map.insert($key.to_string(), Value::from(self.$field.clone())); )*
                // Raw values kept from a type mismatch win over the defaults.
                for (key, value) in &self.extra {
                    map.insert(key.clone(), value.clone());
                }
                map.serialize(serializer)
            }
        }
    };
}

catalog_entry_fields! {
    id_servicio => "idServicio",
    id_subsistema => "idSubsistema",
    member_name => "memberName",
    x_road_instance => "xRoadInstance",
    member_class => "memberClass",
    member_code => "memberCode",
    subsystem_code => "subsystemCode",
    service_code => "serviceCode",
    service_version => "serviceVersion",
    service_type => "serviceType",
    descripcion => "descripcion",
    respuesta => "respuesta",
    parametros => "parametros",
    responsables => "responsables",
    habilitado => "habilitado",
    nombre_archivo_adjunto => "nombreArchivoAdjunto",
    endpoint_method => "endpointMethod",
    endpoint_path => "endpointPath",
    url_documentacion => "urlDocumentacion",
    url_solicitud => "urlSolicitud",
    texto_alternativo => "textoAlternativo",
}

/// Move `key` out of `fields` into `slot`. `null` leaves the default; a
/// value of the wrong type is put back so it ends up in `extra`.
fn take_field<T: DeserializeOwned>(fields: &mut Map<String, Value>, key: &str, slot: &mut T) {
    let Some(value) = fields.remove(key) else {
        return;
    };
    if value.is_null() {
        return;
    }
    match T::deserialize(&value) {
        Ok(parsed) => *slot = parsed,
        Err(e) => {
            tracing::warn!("Catalog field '{}' has an unexpected value {}: {}", key, value, e);
            fields.insert(key.to_string(), value);
        }
    }
}

impl CatalogEntry {
    pub fn is_published(&self) -> bool {
        self.habilitado
    }

    /// Attachment link, if the entry has one.
    pub fn attachment(&self) -> Option<&str> {
        non_blank(&self.nombre_archivo_adjunto)
    }

    pub fn documentation_url(&self) -> Option<&str> {
        self.url_documentacion.as_deref().and_then(non_blank)
    }

    pub fn request_form_url(&self) -> Option<&str> {
        self.url_solicitud.as_deref().and_then(non_blank)
    }
}

fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_credentials_serialize_with_pascal_case_keys() {
        let creds = Credentials::new("portaledi", "PortalEdi1945!");
        let body = serde_json::to_value(&creds).unwrap();
        assert_eq!(
            body,
            json!({"Username": "portaledi", "Password": "PortalEdi1945!"})
        );
        assert!(!format!("{:?}", creds).contains("PortalEdi1945!"));
    }

    #[test]
    fn test_token_preview_and_redaction() {
        let token = Token::new("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9");
        assert_eq!(token.preview(20), "eyJhbGciOiJIUzI1NiIs...");
        assert_eq!(Token::new("abc").preview(20), "abc");
        assert_eq!(format!("{:?}", token), "Token(***)");
    }

    #[test]
    fn test_catalog_entry_tolerates_nulls_and_keeps_unknown_keys() {
        let entry: CatalogEntry = serde_json::from_value(json!({
            "idServicio": 7,
            "memberName": "Dirección General de Rentas",
            "descripcion": null,
            "habilitado": true,
            "urlDocumentacion": null,
            "urlSolicitud": "https://example.gob.ar/solicitud",
            "nuevoCampo": {"a": 1}
        }))
        .unwrap();

        assert_eq!(entry.id_servicio, 7);
        assert_eq!(entry.descripcion, "");
        assert!(entry.is_published());
        assert_eq!(entry.documentation_url(), None);
        assert_eq!(entry.request_form_url(), Some("https://example.gob.ar/solicitud"));
        assert_eq!(entry.extra.get("nuevoCampo"), Some(&json!({"a": 1})));
    }

    #[test]
    fn test_mistyped_field_falls_back_and_keeps_raw_value() {
        let entry: CatalogEntry = serde_json::from_value(json!({
            "idServicio": "2",
            "serviceCode": "padron",
            "habilitado": "si"
        }))
        .unwrap();

        assert_eq!(entry.id_servicio, 0);
        assert_eq!(entry.service_code, "padron");
        assert!(!entry.is_published());
        assert_eq!(entry.extra.get("idServicio"), Some(&json!("2")));
        assert_eq!(entry.extra.get("habilitado"), Some(&json!("si")));

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["idServicio"], json!("2"));
        assert_eq!(back["serviceCode"], json!("padron"));
    }

    #[test]
    fn test_non_object_entry_is_rejected() {
        assert!(serde_json::from_value::<CatalogEntry>(json!(42)).is_err());
    }

    #[test]
    fn test_login_response_without_token() {
        let resp: LoginResponse = serde_json::from_value(json!({"message": "ok"})).unwrap();
        assert!(resp.token.is_none());
    }
}
