use anyhow::{Result, anyhow};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::file_utils::{FileManager, SCRATCH_DIR};
use crate::prompts;
use crate::providers::{GenerationProvider, GenerationRequest};
use crate::vtt_processor;

// @module: Batch orchestration of per-file report generation

/// Outcome tally of a batch run. Mutated only by the controller, finalized
/// when the run ends.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// Files processed (bounded by the file limit)
    pub attempted: usize,

    /// Files whose report was generated and written
    pub succeeded: usize,

    /// All discovered input files, in processing order
    pub files: Vec<PathBuf>,
}

impl BatchSummary {
    fn new(files: Vec<PathBuf>) -> Self {
        Self {
            attempted: 0,
            succeeded: 0,
            files,
        }
    }

    /// Whether every attempted file succeeded (vacuously true for an empty
    /// batch)
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.attempted
    }
}

/// Main application controller driving the batch run
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Remote generation provider
    provider: Arc<dyn GenerationProvider>,
    // @field: Directory for converted upload copies
    scratch_dir: PathBuf,
}

impl Controller {
    // @method: Create a new controller with the given configuration and provider
    pub fn new(config: Config, provider: Arc<dyn GenerationProvider>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            provider,
            scratch_dir: PathBuf::from(SCRATCH_DIR),
        })
    }

    /// Override the scratch directory used for converted upload copies
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// Run the batch: discover `.vtt` files under `input_dir`, process each
    /// strictly in sorted order, write one `.md` per success, and return
    /// the tally. A failure of one file never aborts the batch.
    pub async fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<BatchSummary> {
        let files = FileManager::find_vtt_files(input_dir)?;
        if files.is_empty() {
            warn!("No .vtt files found under {:?}", input_dir);
            return Ok(BatchSummary::new(files));
        }

        info!(
            "Found {} VTT file(s). Writing to: {:?}",
            files.len(),
            output_dir
        );

        let mut summary = BatchSummary::new(files.clone());
        for vtt_path in &files {
            if self.config.limit_files > 0 && summary.attempted >= self.config.limit_files {
                debug!("Reached file limit: {}", self.config.limit_files);
                break;
            }

            summary.attempted += 1;
            match self.process_file(vtt_path, input_dir, output_dir).await {
                Ok(output_path) => {
                    info!("[ok] {:?} -> {:?}", vtt_path, output_path);
                    summary.succeeded += 1;
                }
                Err(e) => {
                    error!("[fail] {:?}: {}", vtt_path, e);
                }
            }
        }

        Ok(summary)
    }

    /// Process one input file end to end: generate the report text and
    /// write it to the mirrored output path. The output file is written
    /// once, after the full result is assembled.
    async fn process_file(
        &self,
        vtt_path: &Path,
        input_root: &Path,
        output_root: &Path,
    ) -> Result<PathBuf> {
        let output_path = FileManager::mirror_output_path(vtt_path, input_root, output_root)?;

        let report = if self.config.use_attachments {
            self.generate_with_attachment(vtt_path).await?
        } else {
            self.generate_inline(vtt_path).await?
        };

        FileManager::write_to_file(&output_path, &report)?;
        Ok(output_path)
    }

    /// Attachment mode: upload the file into a fresh vector store and
    /// instruct the model to read it through file_search. The store and
    /// any scratch copy are released on every exit path.
    async fn generate_with_attachment(&self, vtt_path: &Path) -> Result<String> {
        // The upload endpoint only accepts specific file types; anything
        // else goes up as a plain-text copy with the same stem
        let scratch_copy = if FileManager::is_upload_allowed(vtt_path) {
            None
        } else {
            let copy = FileManager::create_scratch_copy(vtt_path, &self.scratch_dir)?;
            debug!("Converted to uploadable: {:?}", copy);
            Some(copy)
        };
        let upload_path = scratch_copy.as_deref().unwrap_or(vtt_path);

        let result = self.attachment_flow(vtt_path, upload_path).await;

        if let Some(copy) = &scratch_copy {
            FileManager::remove_scratch_copy(copy);
        }

        result
    }

    async fn attachment_flow(&self, vtt_path: &Path, upload_path: &Path) -> Result<String> {
        let stem = vtt_path
            .file_stem()
            .ok_or_else(|| anyhow!("Input file has no stem: {:?}", vtt_path))?
            .to_string_lossy();
        let filename = vtt_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        debug!("Uploading file for attachment: {:?}", upload_path);
        let store_id = self
            .provider
            .create_store(&format!("vttreport-{}", stem))
            .await?;

        // Upload/indexing failures are not retried; release the store and
        // surface them as this file's failure
        let file_id = match self.provider.upload_and_index(&store_id, upload_path).await {
            Ok(file_id) => file_id,
            Err(e) => {
                let _ = self.provider.delete_store(&store_id, None).await;
                return Err(e.into());
            }
        };

        let prompt = prompts::build_attachment_prompt(
            &self.config.prompts.system_prompt,
            &self.config.prompts.user_prompt,
            &filename,
        );
        let request = GenerationRequest::new(prompt, self.config.remote.model.clone())
            .with_vector_store(&store_id);

        let generated = self.provider.generate(request).await;
        let _ = self
            .provider
            .delete_store(&store_id, Some(&file_id))
            .await;

        Ok(generated?)
    }

    /// Inline mode: extract the transcript text and embed it directly in
    /// the prompt, with no upload
    async fn generate_inline(&self, vtt_path: &Path) -> Result<String> {
        debug!("Reading VTT as text (no attachments): {:?}", vtt_path);

        let filename = vtt_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        let content = FileManager::read_to_string(vtt_path)?;
        let transcript = vtt_processor::extract_from_str(&content);

        let user_prompt = prompts::format_user_prompt(
            &self.config.prompts.user_prompt,
            &filename,
            &transcript,
        );
        let prompt =
            prompts::build_prompt_input(&self.config.prompts.system_prompt, &user_prompt);

        let request = GenerationRequest::new(prompt, self.config.remote.model.clone());
        Ok(self.provider.generate(request).await?)
    }
}
