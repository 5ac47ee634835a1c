//! 文件审计后端
//!
//! 每个租户一个只追加的 JSON Lines 文件：`<dir>/<tenantId>.jsonl`，
//! 每行一条 `AuditEntry`。租户标识会成为文件名，所以只接受合法的租户标识。

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};
use warden_common::{TenantId, is_valid_tenant_id};

use super::AuditBackend;
use crate::entry::{AuditEntry, AuditEvent};
use crate::error::{AuditError, AuditResult};

const PARTITION_EXT: &str = "jsonl";

/// 单个分区的链尾缓存
#[derive(Debug, Default)]
struct Tail {
    loaded: bool,
    last: Option<AuditEntry>,
}

/// 从磁盘读出的分区
#[derive(Debug, Default)]
struct Partition {
    entries: Vec<AuditEntry>,
    /// 最后一个完整行之后的字节偏移
    committed: u64,
    /// 文件末尾是否留有未写完的行
    torn: bool,
}

/// 文件审计后端
#[derive(Debug)]
pub struct FileBackend {
    dir: PathBuf,
    tails: RwLock<HashMap<TenantId, Arc<Mutex<Tail>>>>,
}

impl FileBackend {
    /// 打开（必要时创建）审计目录
    pub fn open<P: AsRef<Path>>(dir: P) -> AuditResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        debug!("Audit file backend opened at {}", dir.display());

        Ok(Self {
            dir,
            tails: RwLock::new(HashMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 租户分区的文件路径
    pub fn partition_path(&self, tenant_id: &TenantId) -> AuditResult<PathBuf> {
        if !is_valid_tenant_id(tenant_id.as_str()) {
            return Err(AuditError::InvalidTenant(tenant_id.to_string()));
        }
        Ok(self
            .dir
            .join(format!("{}.{PARTITION_EXT}", tenant_id.as_str())))
    }

    fn tail(&self, tenant_id: &TenantId) -> Arc<Mutex<Tail>> {
        if let Some(tail) = self.tails.read().get(tenant_id) {
            return Arc::clone(tail);
        }

        let mut tails = self.tails.write();
        Arc::clone(tails.entry(tenant_id.clone()).or_default())
    }

    /// 读取分区文件
    ///
    /// 没有换行结尾的最后一行来自中断的写入，不计入分区。
    fn read_partition(path: &Path) -> AuditResult<Partition> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Partition::default()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = BufReader::new(file);
        let mut partition = Partition::default();
        let mut line = Vec::new();
        loop {
            line.clear();
            let read = reader.read_until(b'\n', &mut line)?;
            if read == 0 {
                break;
            }
            if line.last() != Some(&b'\n') {
                partition.torn = true;
                break;
            }
            if !line.trim_ascii().is_empty() {
                partition.entries.push(serde_json::from_slice(&line)?);
            }
            partition.committed += read as u64;
        }
        Ok(partition)
    }

    /// 截掉最后一个完整行之后的残留字节
    fn truncate_partition(path: &Path, committed: u64) -> AuditResult<()> {
        OpenOptions::new().write(true).open(path)?.set_len(committed)?;
        Ok(())
    }
}

impl AuditBackend for FileBackend {
    fn append(&self, event: AuditEvent) -> AuditResult<AuditEntry> {
        let path = self.partition_path(event.tenant_id())?;
        let tail = self.tail(event.tenant_id());
        let mut tail = tail.lock();

        if !tail.loaded {
            let partition = Self::read_partition(&path)?;
            if partition.torn {
                warn!(
                    tenant_id = %event.tenant_id(),
                    committed = partition.committed,
                    "Discarding torn audit line"
                );
                Self::truncate_partition(&path, partition.committed)?;
            }
            tail.last = partition.entries.into_iter().last();
            tail.loaded = true;
            debug!(
                tenant_id = %event.tenant_id(),
                sequence = ?tail.last.as_ref().map(|e| e.sequence),
                "Recovered audit chain tail from disk"
            );
        }

        let entry = AuditEntry::seal(event, tail.last.as_ref());
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        let committed = file.metadata()?.len();
        if let Err(e) = file.write_all(line.as_bytes()).and_then(|()| file.flush()) {
            // 写入失败时回到写入前的长度，链尾不变
            if let Err(truncate) = file.set_len(committed) {
                warn!(
                    tenant_id = %entry.tenant_id,
                    error = %truncate,
                    "Failed to roll back partial audit line"
                );
                tail.loaded = false;
            }
            return Err(e.into());
        }

        debug!(
            tenant_id = %entry.tenant_id,
            sequence = entry.sequence,
            action = %entry.action,
            "Audit entry appended"
        );
        tail.last = Some(entry.clone());
        Ok(entry)
    }

    fn entries(&self, tenant_id: &TenantId) -> AuditResult<Vec<AuditEntry>> {
        let path = self.partition_path(tenant_id)?;
        let tail = self.tail(tenant_id);
        let _guard = tail.lock();
        Ok(Self::read_partition(&path)?.entries)
    }

    fn clear_tenant(&self, tenant_id: &TenantId) -> AuditResult<()> {
        let path = self.partition_path(tenant_id)?;
        let tail = self.tail(tenant_id);
        let mut tail = tail.lock();

        match fs::remove_file(&path) {
            Ok(()) => info!("Removed audit partition {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tail.last = None;
        tail.loaded = true;
        Ok(())
    }

    fn clear_all(&self) -> AuditResult<()> {
        for tenant_id in self.tenants()? {
            self.clear_tenant(&tenant_id)?;
        }
        Ok(())
    }

    fn tenants(&self) -> AuditResult<Vec<TenantId>> {
        let mut tenants = Vec::new();
        for dir_entry in fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(PARTITION_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str())
                && is_valid_tenant_id(stem)
            {
                tenants.push(TenantId::new(stem));
            }
        }
        tenants.sort();
        Ok(tenants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partition_path_rejects_unsafe_tenant() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        for bad in ["../etc", "Acme", "a", "acme/x", ""] {
            let result = backend.append(AuditEvent::new(TenantId::new(bad), "u", "a", "r"));
            assert!(
                matches!(result, Err(AuditError::InvalidTenant(_))),
                "accepted {bad:?}"
            );
        }
        assert!(backend.tenants().unwrap().is_empty());
    }

    #[test]
    fn test_one_line_per_entry() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();
        let tenant = TenantId::new("acme");

        for action in ["case.create", "case.update", "case.export"] {
            backend
                .append(AuditEvent::new(tenant.clone(), "u-1", action, "case"))
                .unwrap();
        }

        let raw = fs::read_to_string(dir.path().join("acme.jsonl")).unwrap();
        assert_eq!(raw.lines().count(), 3);
        assert!(raw.lines().all(|line| line.starts_with('{')));
        assert_eq!(backend.tenants().unwrap(), vec![tenant]);
    }

    #[test]
    fn test_clear_tenant_restarts_chain() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();
        let tenant = TenantId::new("acme");

        backend
            .append(AuditEvent::new(tenant.clone(), "u-1", "a", "r"))
            .unwrap();
        backend.clear_tenant(&tenant).unwrap();
        assert!(backend.entries(&tenant).unwrap().is_empty());

        let entry = backend
            .append(AuditEvent::new(tenant.clone(), "u-1", "b", "r"))
            .unwrap();
        assert_eq!(entry.sequence, 0);

        // clearing a partition that never existed is fine
        backend.clear_tenant(&TenantId::new("globex")).unwrap();
    }

    #[test]
    fn test_torn_trailing_line_is_discarded() {
        let dir = TempDir::new().unwrap();
        let tenant = TenantId::new("acme");
        {
            let backend = FileBackend::open(dir.path()).unwrap();
            for action in ["case.create", "case.update"] {
                backend
                    .append(AuditEvent::new(tenant.clone(), "u-1", action, "case"))
                    .unwrap();
            }
        }

        // a write cut off before its newline
        let path = dir.path().join("acme.jsonl");
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(br#"{"id":"cut-off","tenantId":"ac"#).unwrap();
        drop(file);

        let backend = FileBackend::open(dir.path()).unwrap();
        assert_eq!(backend.entries(&tenant).unwrap().len(), 2);

        let entry = backend
            .append(AuditEvent::new(tenant.clone(), "u-1", "case.export", "case"))
            .unwrap();
        assert_eq!(entry.sequence, 2);

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw.lines().count(), 3);
        assert!(!raw.contains("cut-off"));

        let entries = backend.entries(&tenant).unwrap();
        assert!(crate::entry::verify_chain(&tenant, &entries).is_ok());
    }
}
