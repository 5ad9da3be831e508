use anyhow::Result;
use httpmock::prelude::*;
use portal_catalog::app::commands;
use portal_catalog::config::toml_config::TomlConfig;
use portal_catalog::core::query::CatalogQuery;
use portal_catalog::utils::validation::Validate;
use portal_catalog::{CatalogClient, CatalogService, PortalConfig};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

fn mock_upstream(server: &MockServer, count: i64) {
    let entries: Vec<serde_json::Value> = (1..=count)
        .map(|id| {
            json!({
                "idServicio": id,
                "memberName": if id % 3 == 0 { "Catastro" } else { "Rentas" },
                "serviceCode": format!("servicio{}", id),
                "descripcion": format!("Servicio número {}", id),
                "serviceType": "REST",
                "habilitado": id % 2 == 1
            })
        })
        .collect();

    server.mock(|when, then| {
        when.method(POST)
            .path("/api/authenticate/login")
            .json_body(json!({"Username": "portaledi", "Password": "PortalEdi1945!"}));
        then.status(200).json_body(json!({"token": "abc123"}));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/CatalogoServicios")
            .header("authorization", "Bearer abc123");
        then.status(200).json_body(json!(entries));
    });
}

/// Settings come from a TOML file, the listing is paged with the file's
/// page size.
#[tokio::test]
async fn test_list_from_file_config() -> Result<()> {
    let server = MockServer::start();
    mock_upstream(&server, 20);

    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"
[api]
base_url = "{}"

[auth]
username = "portaledi"
password = "PortalEdi1945!"

[catalog]
page_size = 5
"#,
        server.url("/api")
    )?;

    let file_config = TomlConfig::from_file(file.path())?;
    let config = PortalConfig::default().with_file(&file_config);
    config.validate()?;

    let service = CatalogService::<CatalogClient>::from_config(&config)?;
    let mut out = Vec::new();
    commands::list(
        &service,
        &CatalogQuery::default(),
        2,
        config.page_size,
        false,
        &mut out,
    )
    .await?;

    let text = String::from_utf8(out)?;
    assert!(text.contains("10 published services · 20 results"));
    assert!(text.contains("servicio6"));
    assert!(!text.contains("servicio11"));
    assert!(text.contains("Showing 6-10 of 20 services"));
    assert!(text.contains("Pages: 1 [2] 3 4"));
    Ok(())
}

#[tokio::test]
async fn test_show_renders_detail() -> Result<()> {
    let server = MockServer::start();
    mock_upstream(&server, 4);

    let config = PortalConfig {
        base_url: Some(server.url("/api")),
        username: Some("portaledi".to_string()),
        password: Some("PortalEdi1945!".to_string()),
        ..PortalConfig::default()
    };
    let service = CatalogService::<CatalogClient>::from_config(&config)?;

    let mut out = Vec::new();
    let found = commands::show(&service, 3, false, &mut out).await?;
    let text = String::from_utf8(out)?;

    assert!(found);
    assert!(text.starts_with("servicio3 (Published)"));
    assert!(text.contains("Member:       Catastro"));
    assert!(text.contains("No attached documentation."));
    Ok(())
}

#[tokio::test]
async fn test_search_without_matches() -> Result<()> {
    let server = MockServer::start();
    mock_upstream(&server, 4);

    let config = PortalConfig {
        base_url: Some(server.url("/api")),
        username: Some("portaledi".to_string()),
        password: Some("PortalEdi1945!".to_string()),
        ..PortalConfig::default()
    };
    let service = CatalogService::<CatalogClient>::from_config(&config)?;

    let mut out = Vec::new();
    let query = CatalogQuery::new(Some("inexistente".to_string()), None);
    commands::list(&service, &query, 1, 9, false, &mut out).await?;

    let text = String::from_utf8(out)?;
    assert!(text.contains("2 published services · 0 results"));
    assert!(text.contains("No services found."));
    Ok(())
}
