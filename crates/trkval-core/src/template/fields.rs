use trkval_model::{SampleJobSpec, SelectionName};

use crate::template::{Bindings, Field};

/// Placeholders of the job configuration template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobField {
    Nevent,
    GlobalTag,
    Sequence,
    Sample,
    Algorithm,
    Quality,
    Tracks,
}

impl Field for JobField {
    const ALL: &'static [Self] = &[
        JobField::Nevent,
        JobField::GlobalTag,
        JobField::Sequence,
        JobField::Sample,
        JobField::Algorithm,
        JobField::Quality,
        JobField::Tracks,
    ];

    fn token(&self) -> &'static str {
        match self {
            JobField::Nevent => "NEVENT",
            JobField::GlobalTag => "GLOBALTAG",
            JobField::Sequence => "SEQUENCE",
            JobField::Sample => "SAMPLE",
            JobField::Algorithm => "ALGORITHM",
            JobField::Quality => "QUALITY",
            JobField::Tracks => "TRACKS",
        }
    }
}

impl Bindings<JobField> for SampleJobSpec {
    fn value(&self, field: JobField) -> String {
        match field {
            JobField::Nevent => self.events.to_string(),
            JobField::GlobalTag => self.tag.clone(),
            JobField::Sequence => self.sequence.to_string(),
            JobField::Sample => self.sample.clone(),
            JobField::Algorithm => self.algorithm.clone(),
            JobField::Quality => self.quality.clone(),
            JobField::Tracks => self.tracks.clone(),
        }
    }
}

/// Placeholders of the plotting macro template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroField {
    NewFile,
    RefFile,
    RefLabel,
    NewLabel,
    RefRelease,
    NewRelease,
    RefSelection,
    NewSelection,
    /// Name of the macro entry point; must match the generated file name.
    EntryPoint,
}

impl Field for MacroField {
    const ALL: &'static [Self] = &[
        MacroField::NewFile,
        MacroField::RefFile,
        MacroField::RefLabel,
        MacroField::NewLabel,
        MacroField::RefRelease,
        MacroField::NewRelease,
        MacroField::RefSelection,
        MacroField::NewSelection,
        MacroField::EntryPoint,
    ];

    fn token(&self) -> &'static str {
        match self {
            MacroField::NewFile => "NEW_FILE",
            MacroField::RefFile => "REF_FILE",
            MacroField::RefLabel => "REF_LABEL",
            MacroField::NewLabel => "NEW_LABEL",
            MacroField::RefRelease => "REF_RELEASE",
            MacroField::NewRelease => "NEW_RELEASE",
            MacroField::RefSelection => "REFSELECTION",
            MacroField::NewSelection => "NEWSELECTION",
            MacroField::EntryPoint => "TrackValHistoPublisher",
        }
    }
}

/// Values for the plotting macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroBindings {
    pub new_file: String,
    pub ref_file: String,
    pub ref_label: String,
    pub new_label: String,
    pub ref_release: String,
    pub new_release: String,
    pub ref_selection: String,
    pub new_selection: String,
    pub entry_point: String,
}

impl MacroBindings {
    /// Compare the new histograms with a reference copied under `<ref_release>/<ref_selection>/`.
    pub fn with_reference(
        sample: &str,
        new_release: &str,
        new_selection: &SelectionName,
        ref_release: &str,
        ref_selection: &SelectionName,
    ) -> Self {
        let file = format!("val.{sample}.root");
        Self {
            ref_file: format!("{ref_release}/{ref_selection}/{file}"),
            new_file: file,
            ref_label: sample.to_string(),
            new_label: sample.to_string(),
            ref_release: ref_release.to_string(),
            new_release: new_release.to_string(),
            ref_selection: ref_selection.to_string(),
            new_selection: new_selection.to_string(),
            entry_point: sample.to_string(),
        }
    }

    /// No reference available: the new result is its own reference.
    pub fn self_reference(sample: &str, new_release: &str, new_selection: &SelectionName) -> Self {
        let file = format!("val.{sample}.root");
        Self {
            ref_file: file.clone(),
            new_file: file,
            ref_label: sample.to_string(),
            new_label: sample.to_string(),
            ref_release: new_release.to_string(),
            new_release: new_release.to_string(),
            ref_selection: new_selection.to_string(),
            new_selection: new_selection.to_string(),
            entry_point: sample.to_string(),
        }
    }

    /// True when every reference value equals its new-result counterpart.
    pub fn is_self_reference(&self) -> bool {
        self.ref_file == self.new_file
            && self.ref_label == self.new_label
            && self.ref_release == self.new_release
            && self.ref_selection == self.new_selection
    }
}

impl Bindings<MacroField> for MacroBindings {
    fn value(&self, field: MacroField) -> String {
        match field {
            MacroField::NewFile => self.new_file.clone(),
            MacroField::RefFile => self.ref_file.clone(),
            MacroField::RefLabel => self.ref_label.clone(),
            MacroField::NewLabel => self.new_label.clone(),
            MacroField::RefRelease => self.ref_release.clone(),
            MacroField::NewRelease => self.new_release.clone(),
            MacroField::RefSelection => self.ref_selection.clone(),
            MacroField::NewSelection => self.new_selection.clone(),
            MacroField::EntryPoint => self.entry_point.clone(),
        }
    }
}
