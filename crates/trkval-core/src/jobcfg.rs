//! Generated job configuration: input file preamble followed by the rendered template.

const PREAMBLE: &str = "\
import FWCore.ParameterSet.Config as cms
readFiles = cms.untracked.vstring()
secFiles = cms.untracked.vstring()
source = cms.Source (\"PoolSource\",fileNames = readFiles, secondaryFileNames = secFiles)
";

/// Secondary inputs of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecondaryFiles {
    /// Harvesting reads no secondary files.
    Harvesting,
    /// Files of the parent dataset.
    Parent(Vec<String>),
}

/// Input section of a generated job configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    primary: Vec<String>,
    secondary: SecondaryFiles,
}

impl JobConfig {
    /// Build from raw discovery output; entries may already be quoted and comma-terminated.
    pub fn new(primary: Vec<String>, secondary: SecondaryFiles) -> Self {
        Self {
            primary: normalize(primary),
            secondary: match secondary {
                SecondaryFiles::Parent(files) => SecondaryFiles::Parent(normalize(files)),
                SecondaryFiles::Harvesting => SecondaryFiles::Harvesting,
            },
        }
    }

    pub fn primary(&self) -> &[String] {
        &self.primary
    }

    /// Preamble, file lists, then `body` (the rendered job template).
    pub fn render(&self, body: &str) -> String {
        let mut out = String::from(PREAMBLE);
        push_list(&mut out, "readFiles", &self.primary);
        match &self.secondary {
            SecondaryFiles::Parent(files) => push_list(&mut out, "secFiles", files),
            SecondaryFiles::Harvesting => out.push_str("secFiles.extend( (               ) )\n"),
        }
        out.push_str(body);
        out
    }
}

fn push_list(out: &mut String, name: &str, files: &[String]) {
    out.push_str(name);
    out.push_str(".extend( [\n");
    for file in files {
        out.push('\'');
        out.push_str(file);
        out.push_str("',\n");
    }
    out.push_str("]);\n");
}

/// Strip quoting and separators, drop blanks.
fn normalize(entries: Vec<String>) -> Vec<String> {
    entries
        .iter()
        .map(|e| {
            e.trim()
                .trim_end_matches(',')
                .trim()
                .trim_matches(|c: char| c == '\'' || c == '"')
                .to_string()
        })
        .filter(|e| !e.is_empty())
        .collect()
}
