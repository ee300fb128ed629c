use std::{collections::HashSet, time::Instant};

use tracing::info;

use crate::{
    config::BuildConfig,
    dataset::{JobRecord, ResumeRecord},
    error::{MatchError, Result},
    matcher::{
        artifact::Artifact,
        document::{Document, DocumentKind},
        persist::ArtifactStore,
    },
    utils::datastruct::arena::Arena,
    vectorizer::{compare::build_matrix, Vectorizer},
};

/// Orchestrates normalize -> fit -> transform -> similarity matrix and
/// freezes the result into an [`Artifact`].
#[derive(Debug, Clone, Default)]
pub struct ArtifactBuilder {
    config: BuildConfig,
}

impl ArtifactBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build from typed dataset records.
    /// Combined texts follow the configured field order per kind.
    pub fn build(&self, resumes: &[ResumeRecord], jobs: &[JobRecord]) -> Result<Artifact> {
        let resumes = resumes
            .iter()
            .map(|r| Document::from_resume(r, &self.config.resume_fields))
            .collect();
        let jobs = jobs
            .iter()
            .map(|j| Document::from_job(j, &self.config.job_fields))
            .collect();
        self.build_from_documents(resumes, jobs)
    }

    /// Build from prepared documents, kept in the given order.
    ///
    /// # Errors
    /// `Configuration` for invalid config, a document of the wrong kind,
    /// duplicate ids within a kind, or a corpus with no usable token.
    pub fn build_from_documents(&self, resumes: Vec<Document>, jobs: Vec<Document>) -> Result<Artifact> {
        let started = Instant::now();
        self.config.validate()?;
        check_documents(&resumes, DocumentKind::Resume)?;
        check_documents(&jobs, DocumentKind::Job)?;
        info!(resumes = resumes.len(), jobs = jobs.len(), "building artifact");

        let resume_texts: Vec<&str> = resumes.iter().map(|d| d.combined_text.as_str()).collect();
        let job_texts: Vec<&str> = jobs.iter().map(|d| d.combined_text.as_str()).collect();
        let corpus: Vec<&str> = resume_texts.iter().chain(job_texts.iter()).copied().collect();

        let mut vectorizer: Vectorizer = Vectorizer::new(self.config.max_features, self.config.stop_word_set());
        vectorizer.fit(&corpus)?;
        let resume_vectors = vectorizer.transform_all(&resume_texts)?;
        let job_vectors = vectorizer.transform_all(&job_texts)?;
        let fit_done = Instant::now();

        let matrix = build_matrix(&resume_vectors, &job_vectors);
        let vocabulary = vectorizer.into_state().ok_or(MatchError::NotFitted)?;
        info!(
            vocab = vocabulary.dim(),
            rows = matrix.rows(),
            cols = matrix.cols(),
            vectorize_ms = fit_done.duration_since(started).as_secs_f64() * 1000.0,
            matrix_ms = fit_done.elapsed().as_secs_f64() * 1000.0,
            "artifact built"
        );

        Ok(Artifact::new(
            vocabulary,
            resumes.into_iter().collect::<Arena<_>>(),
            jobs.into_iter().collect::<Arena<_>>(),
            resume_vectors,
            job_vectors,
            matrix,
            self.config.rescore,
        ))
    }

    /// Load the artifact behind `handle` when the store has one, otherwise
    /// build it from `datasets` and persist it there.
    pub fn load_or_build<S, F>(&self, store: &S, handle: &S::Handle, datasets: F) -> Result<Artifact>
    where
        S: ArtifactStore,
        F: FnOnce() -> Result<(Vec<ResumeRecord>, Vec<JobRecord>)>,
    {
        if store.contains(handle) {
            return store.load(handle);
        }
        info!("no persisted artifact; building from datasets");
        let (resumes, jobs) = datasets()?;
        let artifact = self.build(&resumes, &jobs)?;
        store.save(&artifact)?;
        Ok(artifact)
    }
}

fn check_documents(docs: &[Document], kind: DocumentKind) -> Result<()> {
    let mut seen = HashSet::with_capacity(docs.len());
    for doc in docs {
        if doc.kind != kind {
            return Err(MatchError::config(format!("{} {} supplied where a {kind} was expected", doc.kind, doc.id)));
        }
        if !seen.insert(doc.id) {
            return Err(MatchError::config(format!("duplicate {kind} id {}", doc.id)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dataset::sample_dataset, matcher::persist::MemoryArtifactStore};

    fn resume(id: u64, skills: &str) -> ResumeRecord {
        ResumeRecord { id, skills: Some(skills.into()), ..Default::default() }
    }

    fn job(id: u64, title: &str, description: &str) -> JobRecord {
        JobRecord { id, title: Some(title.into()), job_description: Some(description.into()), ..Default::default() }
    }

    #[test]
    fn build_keeps_order_and_shape() {
        let (resumes, jobs) = sample_dataset();
        let artifact = ArtifactBuilder::default().build(&resumes, &jobs).unwrap();
        assert_eq!(artifact.resume_count(), 5);
        assert_eq!(artifact.job_count(), 3);
        assert_eq!(artifact.matrix().rows(), 5);
        assert_eq!(artifact.matrix().cols(), 3);
        let ids: Vec<u64> = artifact.resumes().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert!(artifact.vocabulary().dim() <= 500);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = ArtifactBuilder::default()
            .build(&[resume(1, "python"), resume(1, "java")], &[job(1, "dev", "python")])
            .unwrap_err();
        assert!(matches!(err, MatchError::Configuration(_)));
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let (resumes, jobs) = sample_dataset();
        let builder = ArtifactBuilder::default();
        let as_jobs: Vec<Document> = jobs.iter().map(|j| Document::from_job(j, &builder.config().job_fields)).collect();
        let docs: Vec<Document> = resumes.iter().map(|r| Document::from_resume(r, &builder.config().resume_fields)).collect();
        assert!(builder.build_from_documents(as_jobs.clone(), as_jobs).is_err());
        assert!(builder.build_from_documents(docs.clone(), docs).is_err());
    }

    #[test]
    fn invalid_config_aborts_build() {
        let builder = ArtifactBuilder::new(BuildConfig { max_features: 0, ..Default::default() });
        let (resumes, jobs) = sample_dataset();
        assert!(matches!(builder.build(&resumes, &jobs), Err(MatchError::Configuration(_))));
    }

    #[test]
    fn all_empty_corpus_is_a_configuration_error() {
        let resumes = vec![ResumeRecord { id: 1, ..Default::default() }];
        let jobs = vec![JobRecord { id: 1, ..Default::default() }];
        assert!(matches!(ArtifactBuilder::default().build(&resumes, &jobs), Err(MatchError::Configuration(_))));
    }

    #[test]
    fn max_features_bounds_dimensionality() {
        let builder = ArtifactBuilder::new(BuildConfig { max_features: 4, ..Default::default() });
        let (resumes, jobs) = sample_dataset();
        let artifact = builder.build(&resumes, &jobs).unwrap();
        assert_eq!(artifact.vocabulary().dim(), 4);
        for i in 0..artifact.resume_count() {
            assert_eq!(artifact.vector_by_index(DocumentKind::Resume, i).unwrap().dim(), 4);
        }
    }

    #[test]
    fn load_or_build_builds_once_then_loads() {
        let store = MemoryArtifactStore::new();
        let builder = ArtifactBuilder::default();
        let built = builder.load_or_build(&store, &0, || Ok(sample_dataset())).unwrap();
        assert!(store.contains(&0));

        let loaded = builder
            .load_or_build(&store, &0, || -> Result<(Vec<ResumeRecord>, Vec<JobRecord>)> {
                panic!("datasets must not be read when an artifact exists")
            })
            .unwrap();
        assert_eq!(built, loaded);
    }
}
