//! JSON page configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::beams::field::BeamConfig;
use crate::card::CardData;
use crate::carousel::CarouselConfig;
use crate::foundation::error::{FolioError, FolioResult};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Header {
    pub name: String,
    pub subtitle: String,
    /// Heading shown above the carousel.
    pub section_title: String,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            name: "Sofia Elizondo Piña".to_owned(),
            subtitle: "Portfolio".to_owned(),
            section_title: "My listed projects".to_owned(),
        }
    }
}

/// Everything needed to mount a [`crate::page::Page`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FolioConfig {
    pub header: Header,
    pub cards: Vec<CardData>,
    pub carousel: CarouselConfig,
    pub beams: BeamConfig,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            header: Header::default(),
            cards: default_cards(),
            carousel: CarouselConfig::default(),
            beams: BeamConfig::default(),
        }
    }
}

impl FolioConfig {
    /// Parse a configuration from a JSON reader. Missing sections take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> FolioResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| FolioError::serde(format!("parse folio config JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> FolioResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            FolioError::validation(format!("open folio config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> FolioResult<()> {
        if self.header.name.trim().is_empty() {
            return Err(FolioError::validation("header.name must be non-empty"));
        }
        for (i, card) in self.cards.iter().enumerate() {
            card.validate()
                .map_err(|e| FolioError::validation(format!("cards[{i}]: {e}")))?;
        }
        self.carousel.validate()?;
        self.beams.validate()?;
        Ok(())
    }
}

fn card(title: &str, description: &str, link: &str) -> CardData {
    CardData {
        src: "/path/to/image.jpg".to_owned(),
        title: title.to_owned(),
        description: description.to_owned(),
        link: link.to_owned(),
    }
}

fn default_cards() -> Vec<CardData> {
    vec![
        card(
            "React Bussiness Website",
            "Developed a responsive, SEO-optimized React/Tailwind site and integrated Make \
             (Integromat) automation to send form submissions automatically.",
            "https://sintmex.netlify.app/",
        ),
        card(
            "Storage Management System",
            "Built a full-stack, serverless data-management app with passwordless OTP \
             authentication, file upload/preview/rename/share features, Google-style search, \
             responsive UI, and clean architecture with robust backend logic.",
            "https://example.com/project2",
        ),
        card(
            "NodeJS PostgreSQL & NGINX App with AWS Deployment",
            "Deployed a Node.js, PostgreSQL, and NGINX backend on AWS using EC2, RDS, \
             Application Load Balancer, and IAM, gaining hands-on experience with the AWS \
             ecosystem and cloud infrastructure management.",
            "https://example.com/project3",
        ),
        card(
            "DevOps & Backend API Development",
            "Built and deployed an API with JWT authentication and authorization, role-based \
             access control, and user management for accounts, listings, and deal management; \
             implemented health monitoring for endpoints, request validation via Zod, \
             structured logging with Winston, and secure endpoints using Arcjet; used \
             PostgreSQL for data management, Docker for containerization, and Kubernetes for \
             container orchestration at scale; applied Jest and Supertest for automated \
             testing and validation, and designed CI/CD pipelines for streamlined build, test, \
             and deployment workflows.",
            "https://example.com/project3",
        ),
    ]
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
