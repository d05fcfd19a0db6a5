//! Rendering of command results

use std::io::Write;
use std::path::PathBuf;

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use polly_config::{PathResolver, Prefix, ResolvedPath};
use polly_platform::{print_version, BuildInfo};
use serde::Serialize;

use crate::error::CliError;

/// Everything `polly paths` reports
#[derive(Debug, Serialize)]
pub struct PathsReport {
    pub prefix: Prefix,
    pub dirs: Vec<ResolvedPath>,
    pub pid_file: PathBuf,
    pub bin_file: PathBuf,
    pub unit_file: &'static str,
    pub init_file: &'static str,
    pub env_file: &'static str,
}

impl PathsReport {
    pub fn collect(resolver: &PathResolver) -> Self {
        use polly_config::fixed_paths::{ENV_FILE_NAME, INIT_FILE_PATH, UNIT_FILE_PATH};

        Self {
            prefix: resolver.prefix(),
            dirs: resolver.layout(),
            pid_file: resolver.pid_file_path(),
            bin_file: resolver.bin_file_path(),
            unit_file: UNIT_FILE_PATH,
            init_file: INIT_FILE_PATH,
            env_file: ENV_FILE_NAME,
        }
    }
}

/// Outcome of creating one directory during `polly setup`
#[derive(Debug, Serialize)]
pub struct SetupEntry {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
struct PidReport<'a> {
    pid: u32,
    path: &'a std::path::Path,
}

/// Output renderer for CLI results
#[derive(Clone, Copy)]
pub struct OutputRenderer {
    /// Use JSON output format
    json: bool,
}

impl OutputRenderer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn render_version<W: Write + ?Sized>(
        &self,
        out: &mut W,
        info: &BuildInfo,
    ) -> Result<(), CliError> {
        if self.json {
            return self.write_json(out, info);
        }
        print_version(out, info)?;
        Ok(())
    }

    pub fn render_paths<W: Write + ?Sized>(
        &self,
        out: &mut W,
        report: &PathsReport,
    ) -> Result<(), CliError> {
        if self.json {
            return self.write_json(out, report);
        }

        let prefix = if report.prefix.is_set() {
            report.prefix.as_str()
        } else {
            "(none)"
        };
        writeln!(out, "Prefix: {prefix}")?;

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("Kind").add_attribute(Attribute::Bold),
            Cell::new("Path").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

        for dir in &report.dirs {
            let status = match &dir.warning {
                None => Cell::new("ok").fg(Color::Green),
                Some(warning) => Cell::new(warning.to_string()).fg(Color::Yellow),
            };
            table.add_row(vec![
                Cell::new(dir.kind.as_str()),
                Cell::new(dir.path.display()),
                status,
            ]);
        }
        table.add_row(vec![
            Cell::new("pid file"),
            Cell::new(report.pid_file.display()),
            Cell::new(""),
        ]);
        table.add_row(vec![
            Cell::new("bin file"),
            Cell::new(report.bin_file.display()),
            Cell::new(""),
        ]);

        writeln!(out, "{table}")?;
        writeln!(out, "Unit file: {}", report.unit_file)?;
        writeln!(out, "Init file: {}", report.init_file)?;
        writeln!(out, "Env file:  {}", report.env_file)?;
        Ok(())
    }

    pub fn render_pid<W: Write + ?Sized>(
        &self,
        out: &mut W,
        pid: u32,
        path: &std::path::Path,
    ) -> Result<(), CliError> {
        if self.json {
            return self.write_json(out, &PidReport { pid, path });
        }
        writeln!(out, "{pid}")?;
        Ok(())
    }

    pub fn render_setup<W: Write + ?Sized>(
        &self,
        out: &mut W,
        entries: &[SetupEntry],
    ) -> Result<(), CliError> {
        if self.json {
            return self.write_json(out, entries);
        }
        for entry in entries {
            match &entry.error {
                None => writeln!(out, "created {}", entry.path.display())?,
                Some(error) => writeln!(out, "skipped {}: {error}", entry.path.display())?,
            }
        }
        Ok(())
    }

    fn write_json<W, T>(&self, out: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write + ?Sized,
        T: Serialize + ?Sized,
    {
        serde_json::to_writer_pretty(&mut *out, value)?;
        writeln!(out)?;
        Ok(())
    }
}
