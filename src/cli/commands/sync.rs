use crate::cli::parser::SyncCmd;
use crate::context::AppContext;
use crate::errors::AppResult;
use crate::sync::config::SyncConfig;
use crate::sync::service::{SyncService, archive_name};
use crate::ui::messages::{header, info, success, warning};
use crate::utils::colors::{GREY, RESET};
use std::io;
use std::sync::Arc;

fn set(field: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        *field = v.trim().to_string();
    }
}

/// Copy for display with the secrets blanked out.
fn masked(cfg: &SyncConfig) -> SyncConfig {
    let mut shown = cfg.clone();
    if !shown.webdav.password.is_empty() {
        shown.webdav.password = "********".into();
    }
    shown
}

pub fn handle(cmd: &SyncCmd, ctx: &Arc<AppContext>) -> AppResult<()> {
    let path = SyncConfig::path(ctx);
    let mut cfg = SyncConfig::load(&path)?;

    match cmd {
        SyncCmd::Config {
            print_config,
            enable,
            disable,
            protocol,
            interval,
            remote_path,
            webdav_url,
            webdav_user,
            webdav_password,
            smb_server,
            smb_share,
            smb_mount,
            server_url,
            namespace,
        } => {
            let before = cfg.clone();

            if *enable {
                cfg.enabled = true;
            }
            if *disable {
                cfg.enabled = false;
            }
            if let Some(p) = protocol {
                cfg.protocol = *p;
            }
            if let Some(i) = interval {
                cfg.polling_interval = *i;
            }
            if let Some(r) = remote_path {
                cfg.webdav.remote_path = r.clone();
                cfg.smb.remote_path = r.clone();
            }
            set(&mut cfg.webdav.url, webdav_url);
            set(&mut cfg.webdav.username, webdav_user);
            set(&mut cfg.webdav.password, webdav_password);
            set(&mut cfg.smb.server, smb_server);
            set(&mut cfg.smb.share_name, smb_share);
            if let Some(m) = smb_mount {
                cfg.smb.mount_point = Some(m.trim().to_string()).filter(|m| !m.is_empty());
            }
            set(&mut cfg.socketio.server_url, server_url);
            set(&mut cfg.socketio.namespace, namespace);

            if cfg != before {
                cfg.save(&path)?;
                success(format!("Sync configuration saved to {}", path.display()));
            }
            if *print_config || cfg == before {
                println!("{GREY}# {}{RESET}", path.display());
                println!("{}", serde_json::to_string_pretty(&masked(&cfg))?);
            }
        }

        SyncCmd::Now => {
            let service = SyncService::new(Arc::clone(ctx), cfg);
            let report = service.sync_now()?;
            match report.files {
                Some(n) => success(format!("Snapshot uploaded to {} ({n} file(s)).", report.remote)),
                None => success(format!("Snapshot uploaded to {}.", report.remote)),
            }
        }

        SyncCmd::Test => {
            let service = SyncService::new(Arc::clone(ctx), cfg);
            let detail = service.test_connection()?;
            success(format!("Connection OK: {detail}"));
        }

        SyncCmd::Start => {
            let mut service = SyncService::new(Arc::clone(ctx), cfg);
            service.start()?;
            info("Sync running in the background. Press Enter to stop.");

            let mut line = String::new();
            let _ = io::stdin().read_line(&mut line);
            service.stop();

            header("Sync log");
            for l in service.shared().log.lines() {
                println!("{l}");
            }
        }

        SyncCmd::Status => {
            info(format!(
                "Sync: {} ({})",
                if cfg.enabled { "enabled" } else { "disabled" },
                cfg.protocol.as_str()
            ));
            if cfg.protocol.is_polling() {
                info(format!("Polling interval: {} s", cfg.polling_interval));
            }
            info(format!("Remote archive name: {}", archive_name(ctx)));
            info(format!("Configuration file: {}", path.display()));
            if !path.exists() {
                warning("No configuration file yet; defaults are in use.");
            }
        }
    }
    Ok(())
}
