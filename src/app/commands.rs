use crate::app::render::{render_detail, render_listing};
use crate::core::query::{find_by_id, member_names, paginate, published_count, CatalogQuery};
use crate::core::service::CatalogService;
use crate::core::CatalogApi;
use crate::utils::error::Result;
use std::collections::HashMap;
use std::io::Write;

const TOKEN_PREVIEW_CHARS: usize = 20;

pub async fn list<A: CatalogApi, W: Write>(
    service: &CatalogService<A>,
    query: &CatalogQuery,
    page: usize,
    page_size: usize,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let entries = service.get_catalog().await?;
    let matching = query.apply(&entries);
    tracing::debug!("{} of {} entries match {:?}", matching.len(), entries.len(), query);

    if json {
        serde_json::to_writer_pretty(&mut *out, &matching).map_err(std::io::Error::from)?;
        writeln!(out)?;
        return Ok(());
    }

    let page = paginate(&matching, page, page_size);
    render_listing(out, published_count(&entries), &page)?;
    Ok(())
}

/// Returns `false` when no service has the given id.
pub async fn show<A: CatalogApi, W: Write>(
    service: &CatalogService<A>,
    id: i64,
    json: bool,
    out: &mut W,
) -> Result<bool> {
    let entries = service.get_catalog().await?;

    let Some(entry) = find_by_id(&entries, id) else {
        tracing::warn!("Service {} is not in the catalog", id);
        writeln!(out, "Service {} not found.", id)?;
        return Ok(false);
    };

    if json {
        serde_json::to_writer_pretty(&mut *out, entry).map_err(std::io::Error::from)?;
        writeln!(out)?;
    } else {
        render_detail(out, entry)?;
    }
    Ok(true)
}

pub async fn members<A: CatalogApi, W: Write>(
    service: &CatalogService<A>,
    out: &mut W,
) -> Result<()> {
    let entries = service.get_catalog().await?;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in &entries {
        *counts.entry(entry.member_name.as_str()).or_default() += 1;
    }

    for name in member_names(&entries) {
        let count = counts.get(name.as_str()).copied().unwrap_or_default();
        writeln!(out, "{:>4}  {}", count, name)?;
    }
    Ok(())
}

/// Login only. Reports the outcome and a short token prefix.
pub async fn login<A: CatalogApi, W: Write>(service: &CatalogService<A>, out: &mut W) -> Result<()> {
    let token = service.login().await?;
    writeln!(out, "Login succeeded.")?;
    writeln!(out, "Token: {}", token.preview(TOKEN_PREVIEW_CHARS))?;
    Ok(())
}

/// Login and catalog fetch as two visible steps, then the first entry as
/// returned by the upstream.
pub async fn probe<A: CatalogApi, W: Write>(service: &CatalogService<A>, out: &mut W) -> Result<()> {
    writeln!(out, "--- 1. Login ---")?;
    let token = service.login().await?;
    writeln!(out, "Token: {}", token.preview(TOKEN_PREVIEW_CHARS))?;

    writeln!(out, "--- 2. Catalog ---")?;
    let entries = service.api().fetch_catalog(&token).await?;
    writeln!(out, "Found {} services.", entries.len())?;

    if let Some(first) = entries.first() {
        writeln!(out, "First entry:")?;
        serde_json::to_writer_pretty(&mut *out, first).map_err(std::io::Error::from)?;
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CatalogEntry, Credentials, Token};
    use async_trait::async_trait;

    struct StubApi(Vec<CatalogEntry>);

    #[async_trait]
    impl CatalogApi for StubApi {
        async fn authenticate(&self, _credentials: &Credentials) -> Result<Token> {
            Ok(Token::new("eyJhbGciOiJIUzI1NiJ9.payload.signature"))
        }

        async fn fetch_catalog(&self, _token: &Token) -> Result<Vec<CatalogEntry>> {
            Ok(self.0.clone())
        }
    }

    fn service() -> CatalogService<StubApi> {
        let entry = |id: i64, member: &str| CatalogEntry {
            id_servicio: id,
            member_name: member.to_string(),
            service_code: format!("svc{}", id),
            habilitado: id % 2 == 0,
            ..Default::default()
        };
        CatalogService::new(
            StubApi(vec![entry(1, "Rentas"), entry(2, "Catastro"), entry(3, "Rentas")]),
            Credentials::new("user", "pass"),
        )
    }

    #[tokio::test]
    async fn test_list_json_filters_by_member() {
        let mut out = Vec::new();
        let query = CatalogQuery::new(None, Some("Rentas".to_string()));
        list(&service(), &query, 1, 9, true, &mut out).await.unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let ids: Vec<i64> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["idServicio"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_show_missing_entry() {
        let mut out = Vec::new();
        let found = show(&service(), 99, false, &mut out).await.unwrap();
        assert!(!found);
        assert!(String::from_utf8(out).unwrap().contains("Service 99 not found."));
    }

    #[tokio::test]
    async fn test_members_with_counts() {
        let mut out = Vec::new();
        members(&service(), &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "   1  Catastro\n   2  Rentas\n");
    }

    #[tokio::test]
    async fn test_probe_prints_first_entry() {
        let mut out = Vec::new();
        probe(&service(), &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Token: eyJhbGciOiJIUzI1NiJ9..."));
        assert!(text.contains("Found 3 services."));
        assert!(text.contains("\"serviceCode\": \"svc1\""));
    }
}
