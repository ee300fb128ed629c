//! Typed resume and job records, as supplied by the dataset source.
//!
//! Records are read from JSON arrays. Every text attribute is optional and
//! unknown attributes are ignored, so loosely shaped exports still load.

use std::{fs::File, io::BufReader, path::Path};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(alias = "resume_id")]
    pub id: u64,
    #[serde(default, alias = "candidate_name")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub current_role: Option<String>,
    #[serde(default)]
    pub target_role: Option<String>,
    #[serde(default)]
    pub resume_summary: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
}

impl ResumeRecord {
    /// Present attributes by name, in schema order
    pub fn fields(&self) -> IndexMap<String, String> {
        collect_fields([
            ("name", &self.name),
            ("email", &self.email),
            ("skills", &self.skills),
            ("current_role", &self.current_role),
            ("target_role", &self.target_role),
            ("resume_summary", &self.resume_summary),
            ("education", &self.education),
            ("experience", &self.experience),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(alias = "job_id")]
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub required_skills: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
}

impl JobRecord {
    /// Present attributes by name, in schema order
    pub fn fields(&self) -> IndexMap<String, String> {
        collect_fields([
            ("title", &self.title),
            ("company", &self.company),
            ("location", &self.location),
            ("job_description", &self.job_description),
            ("required_skills", &self.required_skills),
            ("experience_level", &self.experience_level),
        ])
    }
}

fn collect_fields<const N: usize>(fields: [(&str, &Option<String>); N]) -> IndexMap<String, String> {
    fields
        .into_iter()
        .filter_map(|(name, value)| value.as_ref().map(|v| (name.to_string(), v.clone())))
        .collect()
}

/// Read a JSON array of resume records
pub fn load_resumes<P: AsRef<Path>>(path: P) -> Result<Vec<ResumeRecord>> {
    load_json_array(path.as_ref())
}

/// Read a JSON array of job records
pub fn load_jobs<P: AsRef<Path>>(path: P) -> Result<Vec<JobRecord>> {
    load_json_array(path.as_ref())
}

fn load_json_array<T>(path: &Path) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    let reader = BufReader::new(File::open(path)?);
    let records: Vec<T> = serde_json::from_reader(reader)?;
    info!(path = %path.display(), count = records.len(), "dataset loaded");
    Ok(records)
}

/// Built-in sample dataset: five resumes and three jobs.
/// Used when no dataset files are available.
pub fn sample_dataset() -> (Vec<ResumeRecord>, Vec<JobRecord>) {
    let resume = |id: u64, name: &str, email: &str, skills: &str, experience: &str, education: &str| ResumeRecord {
        id,
        name: Some(name.into()),
        email: Some(email.into()),
        skills: Some(skills.into()),
        experience: Some(experience.into()),
        education: Some(education.into()),
        ..Default::default()
    };
    let resumes = vec![
        resume(1, "John Doe", "john@example.com",
            "Python, SQL, Machine Learning, Data Analysis, TensorFlow",
            "5 years in data science and machine learning", "MS in Computer Science"),
        resume(2, "Jane Smith", "jane@example.com",
            "Java, Spring Boot, Microservices, Docker, Kubernetes",
            "7 years in Java development and microservices", "BS in Software Engineering"),
        resume(3, "Mike Johnson", "mike@example.com",
            "Python, Django, React, JavaScript, HTML, CSS",
            "3 years in full-stack web development", "BS in Computer Science"),
        resume(4, "Sarah Williams", "sarah@example.com",
            "Data Science, Python, R, Statistics, Machine Learning",
            "4 years in data analysis and statistics", "MS in Statistics"),
        resume(5, "David Brown", "david@example.com",
            "JavaScript, Node.js, Express, MongoDB, React",
            "5 years in full-stack JavaScript development", "BS in Computer Science"),
    ];

    let job = |id: u64, title: &str, company: &str, location: &str, description: &str, skills: &str, level: &str| JobRecord {
        id,
        title: Some(title.into()),
        company: Some(company.into()),
        location: Some(location.into()),
        job_description: Some(description.into()),
        required_skills: Some(skills.into()),
        experience_level: Some(level.into()),
    };
    let jobs = vec![
        job(1, "Data Scientist", "Tech Corp", "New York, NY",
            "Looking for a data scientist with Python, machine learning, and data analysis skills.",
            "Python, Machine Learning, Data Analysis, SQL, TensorFlow", "Mid Level"),
        job(2, "Java Developer", "Software Inc", "San Francisco, CA",
            "Seeking a Java developer with experience in Spring Boot and microservices.",
            "Java, Spring Boot, Microservices, Docker, SQL", "Senior Level"),
        job(3, "Full Stack Developer", "Web Solutions", "Austin, TX",
            "Need a full-stack developer with JavaScript, React, and Node.js experience.",
            "JavaScript, React, Node.js, HTML, CSS, MongoDB", "Mid Level"),
    ];
    (resumes, jobs)
}
