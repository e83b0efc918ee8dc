use std::path::{Path, PathBuf};

use axum::Router;
use notify::{Event, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tower_http::services::ServeDir;
use tower_livereload::LiveReloadLayer;

use halodream::config::SiteConfig;
use halodream::page;

/// Regenerate the page from the config file (or defaults)
fn regenerate(config: Option<&Path>, output: &Path) -> anyhow::Result<()> {
    let site = SiteConfig::load_or_default(config)?;
    page::write_site(&site, output)?;
    Ok(())
}

/// Whether a watcher event touches the config file
fn touches(event: &Event, config: &Path) -> bool {
    let name = config.file_name();
    event
        .paths
        .iter()
        .any(|p| p.as_path() == config || (name.is_some() && p.file_name() == name))
}

/// Start the development server with live reload
pub async fn serve(config: Option<&Path>, output: &Path, port: u16) -> anyhow::Result<()> {
    // Generate initial page
    regenerate(config, output)?;

    // Create channel for file change notifications
    let (tx, mut rx) = mpsc::channel::<()>(1);

    // Watch the config file's parent directory, if there is a config file
    let mut config_watcher = None;
    if let Some(config) = config {
        let watched = config.to_path_buf();
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
            if let Ok(event) = res {
                if (event.kind.is_modify() || event.kind.is_create()) && touches(&event, &watched) {
                    let _ = tx.blocking_send(());
                }
            }
        })?;

        let watch_path = config
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        watcher.watch(&watch_path, RecursiveMode::NonRecursive)?;
        config_watcher = Some(watcher);
    }

    // Spawn regeneration task
    let config_for_regen = config.map(Path::to_path_buf);
    let output_for_regen = output.to_path_buf();
    tokio::spawn(async move {
        while rx.recv().await.is_some() {
            // Debounce: wait a bit for rapid changes to settle
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

            // Drain any additional notifications
            while rx.try_recv().is_ok() {}

            match regenerate(config_for_regen.as_deref(), &output_for_regen) {
                Ok(()) => tracing::info!("regenerated page"),
                Err(e) => tracing::error!("error regenerating: {e:#}"),
            }
        }
    });

    // Create live reload layer
    let livereload = LiveReloadLayer::new();
    let reloader = livereload.reloader();

    // Reload the browser whenever the output changes (page or wasm bundle)
    let mut output_watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
        if let Ok(event) = res {
            if event.kind.is_modify() || event.kind.is_create() {
                reloader.reload();
            }
        }
    })?;
    output_watcher.watch(output, RecursiveMode::Recursive)?;

    let app = Router::new()
        .fallback_service(ServeDir::new(output))
        .layer(livereload);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("development server running at http://localhost:{port}");
    match config {
        Some(config) => tracing::info!("watching {} for changes", config.display()),
        None => tracing::info!("no config given; serving defaults"),
    }

    // Keep watchers alive
    let _config_watcher = config_watcher;
    let _output_watcher = output_watcher;

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::EventKind;
    use notify::event::{CreateKind, ModifyKind};

    #[test]
    fn config_events_are_recognized() {
        let config = Path::new("site/halodream.yaml");
        let hit = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/abs/site/halodream.yaml"));
        let miss = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/abs/site/other.yaml"));

        assert!(touches(&hit, config));
        assert!(!touches(&miss, config));
    }

    #[test]
    fn regenerate_writes_defaults_without_config() {
        let dir = tempfile::tempdir().unwrap();
        regenerate(None, dir.path()).unwrap();
        assert!(dir.path().join("index.html").exists());
        assert!(dir.path().join("effects.json").exists());
    }

    #[test]
    fn regenerate_reports_bad_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("site.yaml");
        std::fs::write(&config, "title: [").unwrap();
        let err = regenerate(Some(&config), &dir.path().join("out")).unwrap_err();
        assert!(err.to_string().contains("site.yaml"));
    }
}
