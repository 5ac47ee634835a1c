//! Warden 命令行工具
//!
//! 租户标识、权限表、字段保护与审计日志的运维入口

mod cli;

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use warden::error::{Error, Result};
use warden::observability::{ObservabilityGuard, init_observability};
use warden::{AuditLog, AuditQuery, Role, TenantId, Warden, WardenConfig, WardenError};
use warden_audit::AuditBackendKind;
use warden_common::{
    RolePermissions, generate_tenant_id, is_valid_tenant_id, sanitize_tenant_slug,
};
use warden_vault::{MasterKey, mask_sensitive_data};

use cli::{AuditCommands, Cli, Commands, TenantCommands};

const DEFAULT_CONFIG: &str = "config.toml";

/// 以 CLI 身份打开会话时使用的用户名
const CLI_USER: &str = "warden-cli";

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Tenant { command } => Ok(run_tenant(command)),
        Commands::Roles { role } => {
            print_roles(role);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Mask { value, keep } => {
            println!("{}", mask_sensitive_data(&value, keep));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Keygen => {
            println!("{}", MasterKey::generate());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { config_file } => {
            check_config_file(config_file.as_deref().unwrap_or(&cli.config))
        }
        Commands::Encrypt { tenant, plaintext } => {
            let (config, _guard) = load_config(&cli.config)?;
            let session = Warden::from_config(&config)?.session(
                parse_tenant(&tenant)?,
                CLI_USER,
                Role::Owner,
            )?;
            println!("{}", session.protect(&plaintext)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Decrypt { tenant, value } => {
            let (config, _guard) = load_config(&cli.config)?;
            let session = Warden::from_config(&config)?.session(
                parse_tenant(&tenant)?,
                CLI_USER,
                Role::Owner,
            )?;
            match session.reveal(&value)? {
                Some(plaintext) => {
                    println!("{plaintext}");
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("Value could not be decrypted with tenant '{tenant}' key");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Audit { command } => {
            let (config, _guard) = load_config(&cli.config)?;
            run_audit(&config, command)
        }
    }
}

fn run_tenant(command: TenantCommands) -> ExitCode {
    match command {
        TenantCommands::Validate { id } => {
            if is_valid_tenant_id(&id) {
                println!("valid");
                ExitCode::SUCCESS
            } else {
                println!("invalid");
                ExitCode::FAILURE
            }
        }
        TenantCommands::Generate => {
            println!("{}", generate_tenant_id());
            ExitCode::SUCCESS
        }
        TenantCommands::Slug { raw } => {
            println!("{}", sanitize_tenant_slug(&raw));
            ExitCode::SUCCESS
        }
    }
}

fn print_roles(only: Option<Role>) {
    for (role, permissions) in RolePermissions::entries() {
        if only.is_some_and(|r| r != role) {
            continue;
        }
        let tokens: Vec<&str> = permissions.iter().map(|p| p.as_str()).collect();
        println!("{role} ({}): {}", permissions.len(), tokens.join(", "));
    }
}

fn run_audit(config: &WardenConfig, command: AuditCommands) -> Result<ExitCode> {
    if config.audit.backend == AuditBackendKind::Memory {
        warn!("audit.backend is \"memory\"; the audit log of a fresh process is always empty");
    }
    let log = AuditLog::from_config(&config.audit)?;

    match command {
        AuditCommands::List {
            tenant,
            action,
            limit,
            offset,
        } => {
            let query = AuditQuery {
                action,
                limit,
                offset,
            };
            for entry in log.get_audit_log(&parse_tenant(&tenant)?, &query)? {
                println!("{}", serde_json::to_string(&entry)?);
            }
            Ok(ExitCode::SUCCESS)
        }
        AuditCommands::Verify { tenant } => {
            let tenant_id = parse_tenant(&tenant)?;
            match log.verify_chain(&tenant_id) {
                Ok(()) => {
                    println!("ok: {} entries", log.count(&tenant_id)?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    error!("❌ {}", e);
                    println!("broken: {e}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

fn parse_tenant(raw: &str) -> Result<TenantId> {
    TenantId::parse(raw).map_err(|e| WardenError::from(e).into())
}

/// 加载配置文件并初始化日志
///
/// 未显式指定配置且默认位置不存在时使用默认配置。
fn load_config(path: &Path) -> Result<(WardenConfig, ObservabilityGuard)> {
    let config = if path.is_file() {
        WardenConfig::from_file(path)?
    } else if path == Path::new(DEFAULT_CONFIG) {
        WardenConfig::default()
    } else {
        return Err(Error::custom(format!("Config file not found: {path:?}")));
    };

    if let Err(errors) = config.validate() {
        let critical: Vec<&String> = errors.iter().filter(|e| !e.starts_with("Warning:")).collect();
        if !critical.is_empty() {
            for err in &critical {
                eprintln!("❌ {err}");
            }
            return Err(Error::config_validation("配置验证失败，请修复上述错误"));
        }
    }

    let guard = init_observability(&config)
        .with_context(|| format!("Failed to initialize logging for {path:?}"))?;
    Ok((config, guard))
}

/// 测试配置文件是否有效
fn check_config_file(config_path: &Path) -> Result<ExitCode> {
    // Initialize basic logging for check command
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = match WardenConfig::from_file(config_path) {
        Ok(config) => {
            info!("✅ 配置文件解析成功: {:?}", config_path);
            config
        }
        Err(e) => {
            error!("❌ 配置文件解析失败: {}", e);
            return Err(Error::config_validation(format!("配置解析失败: {e}")));
        }
    };

    match config.validate() {
        Ok(()) => {
            info!("✅ 配置验证通过");
            Ok(ExitCode::SUCCESS)
        }
        Err(errors) => {
            warn!("配置验证发现问题:");
            for (i, err) in errors.iter().enumerate() {
                if err.starts_with("Warning:") {
                    info!("  {}. ⚠️  {}", i + 1, err);
                } else {
                    error!("  {}. ❌ {}", i + 1, err);
                }
            }
            let has_errors = errors.iter().any(|e| !e.starts_with("Warning:"));
            if has_errors {
                return Err(Error::config_validation("配置验证失败"));
            }
            info!("✅ 配置可用（仅有警告）");
            Ok(ExitCode::SUCCESS)
        }
    }
}
