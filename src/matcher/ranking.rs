use std::{fmt, sync::Arc};

use tracing::{debug, warn};

use crate::{
    error::{MatchError, Result},
    matcher::{
        artifact::Artifact,
        document::{Document, DocumentKind},
        store::ArtifactHandle,
    },
};

/// How a ranking query names its job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobRef {
    /// exact job id
    Id(u64),
    /// job title, compared case-insensitively
    Title(String),
}

impl From<u64> for JobRef {
    fn from(id: u64) -> Self {
        JobRef::Id(id)
    }
}

impl From<&str> for JobRef {
    fn from(title: &str) -> Self {
        JobRef::Title(title.to_string())
    }
}

/// One ranked document
#[derive(Debug, Clone, PartialEq)]
pub struct HitEntry {
    /// position of the document in the artifact
    pub index: usize,
    pub document: Document,
    /// score in [0, 1]
    pub score: f64,
}

/// Ranking result, best first
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Hits {
    pub list: Vec<HitEntry>,
}

impl Hits {
    pub fn new(list: Vec<HitEntry>) -> Self {
        Hits { list }
    }

    /// Sort by descending score; equal scores keep ascending artifact index.
    pub fn sort_by_score_desc(&mut self) -> &mut Self {
        self.list
            .sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.index.cmp(&b.index)));
        self
    }

    /// Keep the first `limit` entries. `None` or `limit <= 0` keeps all.
    pub fn truncate(&mut self, limit: Option<i64>) -> &mut Self {
        if let Some(n) = limit.filter(|&n| n > 0) {
            self.list.truncate(usize::try_from(n).unwrap_or(usize::MAX));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn scores(&self) -> Vec<f64> {
        self.list.iter().map(|h| h.score).collect()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.list.iter().map(|h| h.document.id).collect()
    }
}

impl fmt::Display for Hits {
    /// `<score>\t<id>\t<label>` per line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for hit in &self.list {
            writeln!(f, "{:.6}\t{}\t{}", hit.score, hit.document.id, hit.document.label())?;
        }
        Ok(())
    }
}

/// Query-facing ranking over the serving artifact.
///
/// Every call takes one snapshot of the artifact at its start, so a
/// concurrent rebuild never mixes two artifacts within a single answer.
#[derive(Debug, Clone)]
pub struct RankingService {
    handle: Arc<ArtifactHandle>,
}

impl RankingService {
    pub fn new(handle: Arc<ArtifactHandle>) -> Self {
        Self { handle }
    }

    pub fn from_artifact(artifact: Artifact) -> Self {
        Self::new(Arc::new(ArtifactHandle::new(artifact)))
    }

    pub fn handle(&self) -> &Arc<ArtifactHandle> {
        &self.handle
    }

    pub fn snapshot(&self) -> Arc<Artifact> {
        self.handle.snapshot()
    }

    /// Resumes ranked against one job.
    ///
    /// The job is found by exact id, or by the first case-insensitive title
    /// match. When nothing matches, job index 0 is used: an unknown job still
    /// gets a ranking rather than an error. With no jobs at all every resume
    /// scores 0.
    pub fn rank_candidates_for_job(&self, job: &JobRef, limit: Option<i64>) -> Result<Hits> {
        let artifact = self.snapshot();
        let job_index = resolve_job(&artifact, job);
        let column = match job_index {
            Some(j) => artifact.matrix().column(j)?,
            None => vec![0.0; artifact.resume_count()],
        };
        debug!(?job, ?job_index, ?limit, "ranking candidates");
        Ok(ranked(&artifact, DocumentKind::Resume, column, limit))
    }

    /// Jobs ranked against one resume.
    ///
    /// # Errors
    /// `NotFound` when no resume has `resume_id`.
    pub fn rank_jobs_for_resume(&self, resume_id: u64, limit: Option<i64>) -> Result<Hits> {
        let artifact = self.snapshot();
        let row = resume_row(&artifact, resume_id)?;
        let scores = artifact.matrix().row(row)?.to_vec();
        debug!(resume_id, row, ?limit, "ranking jobs");
        Ok(ranked(&artifact, DocumentKind::Job, scores, limit))
    }

    /// Best score of a resume across all jobs.
    ///
    /// # Errors
    /// `NotFound` when no resume has `resume_id`.
    pub fn best_score_for_resume(&self, resume_id: u64) -> Result<f64> {
        let artifact = self.snapshot();
        let row = resume_row(&artifact, resume_id)?;
        Ok(rescored(&artifact, artifact.row_max(row)?))
    }

    /// Mean of every resume's best score; 0.0 for an empty artifact.
    pub fn average_match_score(&self) -> Result<f64> {
        let artifact = self.snapshot();
        if artifact.resume_count() == 0 || artifact.job_count() == 0 {
            return Ok(0.0);
        }
        let mut sum = 0.0;
        for row in 0..artifact.resume_count() {
            sum += rescored(&artifact, artifact.row_max(row)?);
        }
        Ok(sum / artifact.resume_count() as f64)
    }

    /// Every resume with a score: the given job's column when that job
    /// exists, otherwise the resume's best score across jobs.
    pub fn candidates(&self, job_id: Option<u64>) -> Result<Hits> {
        let artifact = self.snapshot();
        let scores = match job_id.and_then(|id| artifact.index_of(DocumentKind::Job, id)) {
            Some(j) => artifact.matrix().column(j)?,
            None => (0..artifact.resume_count())
                .map(|row| artifact.row_max(row))
                .collect::<Result<Vec<f64>>>()?,
        };
        Ok(ranked(&artifact, DocumentKind::Resume, scores, None))
    }

    /// resumes in artifact order
    pub fn resumes(&self) -> Vec<Document> {
        self.snapshot().resumes().to_vec()
    }

    /// jobs in artifact order
    pub fn jobs(&self) -> Vec<Document> {
        self.snapshot().jobs().to_vec()
    }
}

fn resolve_job(artifact: &Artifact, job: &JobRef) -> Option<usize> {
    if artifact.job_count() == 0 {
        return None;
    }
    let found = match job {
        JobRef::Id(id) => artifact.index_of(DocumentKind::Job, *id),
        JobRef::Title(title) => artifact.job_index_by_title(title),
    };
    Some(found.unwrap_or_else(|| {
        warn!(?job, "job not found; falling back to job index 0");
        0
    }))
}

fn resume_row(artifact: &Artifact, resume_id: u64) -> Result<usize> {
    artifact
        .index_of(DocumentKind::Resume, resume_id)
        .ok_or(MatchError::NotFound { kind: DocumentKind::Resume, id: resume_id })
}

#[inline]
fn rescored(artifact: &Artifact, score: f64) -> f64 {
    match artifact.rescorer() {
        Some(r) => r.apply(score),
        None => score,
    }
}

/// Pair `scores[i]` with the i-th document of `kind`, sort and truncate.
fn ranked(artifact: &Artifact, kind: DocumentKind, scores: Vec<f64>, limit: Option<i64>) -> Hits {
    let docs = match kind {
        DocumentKind::Resume => artifact.resumes(),
        DocumentKind::Job => artifact.jobs(),
    };
    debug_assert_eq!(docs.len(), scores.len());
    let mut hits = Hits::new(
        docs.iter()
            .zip(scores)
            .enumerate()
            .map(|(index, (document, score))| HitEntry {
                index,
                document: document.clone(),
                score: rescored(artifact, score),
            })
            .collect(),
    );
    hits.sort_by_score_desc().truncate(limit);
    hits
}
