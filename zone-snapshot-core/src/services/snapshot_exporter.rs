//! 快照导出服务
//!
//! 把一个区域的记录集写成 JSON 与 CSV 两个暂存文件。每个区域使用独立的
//! 临时目录，`StagedSnapshot` 被丢弃时目录随之删除。

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::TempDir;
use zone_snapshot_provider::{HostedZone, RecordSet};

use crate::error::{CoreError, CoreResult};
use crate::services::normalizer::normalize_all;
use crate::types::{ArtifactEncoding, CSV_HEADER};

/// JSON 缩进
const JSON_INDENT: &[u8] = b"    ";

/// 空名称或纯点名称的替代文件名
const ROOT_STEM: &str = "root";

/// 将区域名称转换为安全的文件名主干
///
/// 去掉末尾的点，`[A-Za-z0-9._-]` 以外的每个字节编码为 `%XX`（大写十六进制）。
/// `%` 本身也会被编码，因此不同的区域名称不会得到相同的主干。
#[must_use]
pub fn artifact_stem(zone_name: &str) -> String {
    let trimmed = zone_name.strip_suffix('.').unwrap_or(zone_name);
    if trimmed.chars().all(|c| c == '.') {
        return ROOT_STEM.to_string();
    }
    let mut stem = String::with_capacity(trimmed.len());
    for byte in trimmed.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-') {
            stem.push(char::from(byte));
        } else {
            let _ = write!(stem, "%{byte:02X}");
        }
    }
    stem
}

/// 一个已写入并同步到磁盘的暂存文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedArtifact {
    /// 编码
    pub encoding: ArtifactEncoding,
    /// 文件名（`<stem>.<ext>`）
    pub file_name: String,
    /// 完整路径
    pub path: PathBuf,
}

/// 一个区域的暂存快照
///
/// 持有临时目录；丢弃即清理。
#[derive(Debug)]
pub struct StagedSnapshot {
    dir: TempDir,
    stem: String,
    record_sets: usize,
    artifacts: Vec<StagedArtifact>,
}

impl StagedSnapshot {
    /// 暂存目录
    #[must_use]
    pub fn staging_dir(&self) -> &Path {
        self.dir.path()
    }

    /// 文件名主干（安全化的区域名称）
    #[must_use]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// 快照包含的记录集数量
    #[must_use]
    pub fn record_sets(&self) -> usize {
        self.record_sets
    }

    /// 暂存文件，按 `ArtifactEncoding::ALL` 顺序
    #[must_use]
    pub fn artifacts(&self) -> &[StagedArtifact] {
        &self.artifacts
    }

    /// 归档键：`<run timestamp>/<stem>/<stem>.<ext>`
    #[must_use]
    pub fn archive_key(&self, run_timestamp: &str, artifact: &StagedArtifact) -> String {
        format!("{run_timestamp}/{}/{}", self.stem, artifact.file_name)
    }
}

/// 快照导出器
#[derive(Debug, Clone, Default)]
pub struct SnapshotExporter {
    staging_root: Option<PathBuf>,
}

impl SnapshotExporter {
    /// 创建导出器；`staging_root` 为 `None` 时使用系统临时目录
    #[must_use]
    pub fn new(staging_root: Option<PathBuf>) -> Self {
        Self { staging_root }
    }

    /// 将区域的记录集写入新的暂存目录
    ///
    /// 返回前所有文件均已 flush 并 `sync_all`。
    pub fn export(&self, zone: &HostedZone, records: &[RecordSet]) -> CoreResult<StagedSnapshot> {
        let export_error = |detail: String| CoreError::Export {
            zone: zone.name.clone(),
            detail,
        };

        let stem = artifact_stem(&zone.name);
        let mut builder = tempfile::Builder::new();
        builder.prefix("zone-snapshot-");
        let dir = match &self.staging_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|e| export_error(format!("failed to create staging directory: {e}")))?;

        let mut artifacts = Vec::with_capacity(ArtifactEncoding::ALL.len());
        for encoding in ArtifactEncoding::ALL {
            let file_name = format!("{stem}.{}", encoding.extension());
            let path = dir.path().join(&file_name);
            let written = match encoding {
                ArtifactEncoding::Json => write_json(&path, records),
                ArtifactEncoding::Csv => write_csv(&path, records),
            };
            written.map_err(|e| export_error(format!("{file_name}: {e}")))?;

            log::debug!("Staged {} for zone {}", path.display(), zone.name);
            artifacts.push(StagedArtifact {
                encoding,
                file_name,
                path,
            });
        }

        Ok(StagedSnapshot {
            dir,
            stem,
            record_sets: records.len(),
            artifacts,
        })
    }
}

/// 写出带 4 空格缩进的 JSON 数组
fn write_json(path: &Path, records: &[RecordSet]) -> Result<(), String> {
    let file = File::create(path).map_err(|e| e.to_string())?;
    let mut writer = BufWriter::new(file);

    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    records
        .serialize(&mut serializer)
        .map_err(|e| e.to_string())?;
    writer.write_all(b"\n").map_err(|e| e.to_string())?;

    let file = writer.into_inner().map_err(|e| e.to_string())?;
    file.sync_all().map_err(|e| e.to_string())
}

/// 写出 CSV：表头 + 每个（记录集 × 值）一行
fn write_csv(path: &Path, records: &[RecordSet]) -> Result<(), String> {
    let file = File::create(path).map_err(|e| e.to_string())?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(file);

    // 显式写表头：空区域也要有表头
    writer
        .write_record(CSV_HEADER)
        .map_err(|e| e.to_string())?;
    for row in normalize_all(records) {
        writer.serialize(&row).map_err(|e| e.to_string())?;
    }
    writer.flush().map_err(|e| e.to_string())?;

    let file = writer.into_inner().map_err(|e| e.to_string())?;
    file.sync_all().map_err(|e| e.to_string())
}
