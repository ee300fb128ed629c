use serde::{Deserialize, Serialize};

use crate::{
    error::{Axis, MatchError, Result},
    matcher::{document::{Document, DocumentKind}, rescore::LinearRescorer},
    utils::datastruct::arena::Arena,
    vectorizer::{compare::SimilarityMatrix, FeatureVector, VocabularyState},
};

/// Frozen snapshot served by the ranking service.
///
/// Holds the fitted vocabulary, resumes and jobs in fixed order, their
/// vectors and the resume x job similarity matrix. Row i / column j of the
/// matrix always refer to the i-th resume / j-th job of the arenas.
/// Never mutated after construction; a rebuild produces a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    vocabulary: VocabularyState,
    resumes: Arena<Document>,
    jobs: Arena<Document>,
    resume_vectors: Vec<FeatureVector>,
    job_vectors: Vec<FeatureVector>,
    matrix: SimilarityMatrix,
    rescore: Option<LinearRescorer>,
}

impl Artifact {
    pub(crate) fn new(
        vocabulary: VocabularyState,
        resumes: Arena<Document>,
        jobs: Arena<Document>,
        resume_vectors: Vec<FeatureVector>,
        job_vectors: Vec<FeatureVector>,
        matrix: SimilarityMatrix,
        rescore: Option<LinearRescorer>,
    ) -> Self {
        debug_assert_eq!(resumes.len(), matrix.rows());
        debug_assert_eq!(jobs.len(), matrix.cols());
        debug_assert_eq!(resume_vectors.len(), resumes.len());
        debug_assert_eq!(job_vectors.len(), jobs.len());
        Self {
            vocabulary,
            resumes,
            jobs,
            resume_vectors,
            job_vectors,
            matrix,
            rescore,
        }
    }

    pub fn vocabulary(&self) -> &VocabularyState {
        &self.vocabulary
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    pub fn rescorer(&self) -> Option<&LinearRescorer> {
        self.rescore.as_ref()
    }

    #[inline]
    pub fn resume_count(&self) -> usize {
        self.resumes.len()
    }

    #[inline]
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn resumes(&self) -> &[Document] {
        self.resumes.as_slice()
    }

    pub fn jobs(&self) -> &[Document] {
        self.jobs.as_slice()
    }

    /// similarity of resume `resume_index` to job `job_index`
    pub fn matrix_entry(&self, resume_index: usize, job_index: usize) -> Result<f64> {
        self.matrix.get(resume_index, job_index)
    }

    /// best score of a resume across all jobs
    pub fn row_max(&self, resume_index: usize) -> Result<f64> {
        self.matrix.row_max(resume_index)
    }

    pub fn document_by_index(&self, kind: DocumentKind, index: usize) -> Result<&Document> {
        let arena = self.arena(kind);
        arena
            .get(index)
            .ok_or_else(|| MatchError::out_of_range(Axis::from(kind), index, arena.len()))
    }

    pub fn vector_by_index(&self, kind: DocumentKind, index: usize) -> Result<&FeatureVector> {
        let vectors = match kind {
            DocumentKind::Resume => &self.resume_vectors,
            DocumentKind::Job => &self.job_vectors,
        };
        vectors
            .get(index)
            .ok_or_else(|| MatchError::out_of_range(Axis::from(kind), index, vectors.len()))
    }

    /// position of the document with `id`
    pub fn index_of(&self, kind: DocumentKind, id: u64) -> Option<usize> {
        self.arena(kind).position(|d| d.id == id)
    }

    /// first job whose title equals `title`, ignoring case
    pub fn job_index_by_title(&self, title: &str) -> Option<usize> {
        let wanted = title.to_lowercase();
        self.jobs
            .position(|d| d.field("title").map_or(false, |t| t.to_lowercase() == wanted))
    }

    fn arena(&self, kind: DocumentKind) -> &Arena<Document> {
        match kind {
            DocumentKind::Resume => &self.resumes,
            DocumentKind::Job => &self.jobs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dataset::sample_dataset, matcher::builder::ArtifactBuilder};

    fn sample() -> Artifact {
        let (resumes, jobs) = sample_dataset();
        ArtifactBuilder::default().build(&resumes, &jobs).unwrap()
    }

    #[test]
    fn lookups_by_id_and_title() {
        let artifact = sample();
        assert_eq!(artifact.index_of(DocumentKind::Resume, 3), Some(2));
        assert_eq!(artifact.index_of(DocumentKind::Job, 9), None);
        assert_eq!(artifact.job_index_by_title("FULL STACK developer"), Some(2));
        assert_eq!(artifact.job_index_by_title("Astronaut"), None);
        assert_eq!(artifact.document_by_index(DocumentKind::Job, 1).unwrap().label(), "Java Developer");
    }

    #[test]
    fn out_of_range_access_is_an_error() {
        let artifact = sample();
        assert!(matches!(
            artifact.document_by_index(DocumentKind::Resume, 5),
            Err(MatchError::IndexOutOfRange { axis: Axis::Resume, index: 5, len: 5 })
        ));
        assert!(matches!(
            artifact.vector_by_index(DocumentKind::Job, 3),
            Err(MatchError::IndexOutOfRange { axis: Axis::Job, index: 3, len: 3 })
        ));
        assert!(artifact.matrix_entry(0, 3).is_err());
        assert!(artifact.row_max(7).is_err());
    }

    #[test]
    fn matrix_matches_vectors() {
        let artifact = sample();
        for i in 0..artifact.resume_count() {
            for j in 0..artifact.job_count() {
                let a = artifact.vector_by_index(DocumentKind::Resume, i).unwrap();
                let b = artifact.vector_by_index(DocumentKind::Job, j).unwrap();
                let expected = crate::vectorizer::compare::cosine_similarity(a, b);
                assert!((artifact.matrix_entry(i, j).unwrap() - expected).abs() < 1e-12);
            }
        }
    }
}
