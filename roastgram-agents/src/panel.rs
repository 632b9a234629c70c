//! Review panel
//!
//! Runs every enabled reviewer persona against a profile snapshot
//! concurrently and assembles the critiques into one markdown report.

use futures::future::join_all;
use tracing::{debug, info, warn};

use roastgram_core::{focus_list, FocusArea, ProfileSnapshot};

use crate::{
    niche_query, render_hits, CompetitorResearch, ModelError, Persona, PersonaRegistry,
    SearchHit, SharedBackend,
};

/// One review run's input: the fetched snapshot plus the user's options.
#[derive(Debug, Clone)]
pub struct ReviewRequest {
    pub snapshot: ProfileSnapshot,
    /// Emphases the reviewers should concentrate on
    pub focus: Vec<FocusArea>,
    /// Free-text context: what the roast is for, target audience, etc.
    pub context: Option<String>,
}

/// Result from one reviewer
#[derive(Debug, Clone)]
pub struct ReviewerReport {
    pub reviewer_id: String,
    pub reviewer_name: String,
    pub review: String,
}

/// The review panel orchestrator
pub struct ReviewPanel {
    backend: SharedBackend,
    registry: PersonaRegistry,
    research: CompetitorResearch,
    research_enabled: bool,
}

impl ReviewPanel {
    /// Create a panel with the embedded personas
    pub fn new(backend: SharedBackend) -> Self {
        Self {
            backend,
            registry: PersonaRegistry::load_embedded(),
            research: CompetitorResearch::default(),
            research_enabled: true,
        }
    }

    /// Create with a custom persona registry
    pub fn with_registry(backend: SharedBackend, registry: PersonaRegistry) -> Self {
        Self {
            backend,
            registry,
            research: CompetitorResearch::default(),
            research_enabled: true,
        }
    }

    /// Disable competitor research (offline runs, tests)
    pub fn without_research(mut self) -> Self {
        self.research_enabled = false;
        self
    }

    /// Get the persona registry
    pub fn registry(&self) -> &PersonaRegistry {
        &self.registry
    }

    /// List reviewer names
    pub fn list_reviewers(&self) -> Vec<&str> {
        self.registry
            .reviewers()
            .iter()
            .map(|p| p.reviewer.name.as_str())
            .collect()
    }

    /// Run all enabled reviewers on the request.
    ///
    /// Competitor research happens once per run, only when some
    /// reviewer consumes it; each reviewer then runs concurrently.
    /// Reviewer failures are logged and dropped, never fatal.
    pub async fn run(&self, request: &ReviewRequest) -> Vec<ReviewerReport> {
        let reviewers = self.registry.reviewers();

        let hits = if self.research_enabled
            && reviewers.iter().any(|p| p.reviewer.wants_research)
        {
            let query = niche_query(&request.snapshot.biography);
            self.research.search_or_empty(&query).await
        } else {
            Vec::new()
        };

        info!(
            "Running {} reviewers on @{}",
            reviewers.len(),
            request.snapshot.handle
        );

        let futures: Vec<_> = reviewers
            .iter()
            .map(|persona| self.run_reviewer(persona, request, &hits))
            .collect();

        let results = join_all(futures).await;

        results
            .into_iter()
            .filter_map(|result| match result {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!("Reviewer failed: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Run a single reviewer
    async fn run_reviewer(
        &self,
        persona: &Persona,
        request: &ReviewRequest,
        hits: &[SearchHit],
    ) -> Result<ReviewerReport, ModelError> {
        debug!("Running reviewer: {}", persona.reviewer.name);

        let prompt = build_user_prompt(persona, request, hits);
        let review = self
            .backend
            .generate(persona.system_prompt(), &prompt)
            .await?;

        Ok(ReviewerReport {
            reviewer_id: persona.reviewer.id.clone(),
            reviewer_name: persona.reviewer.name.clone(),
            review,
        })
    }
}

/// Build a reviewer's user prompt from the slice of the snapshot its
/// specialty covers, plus the shared focus/context trailer.
fn build_user_prompt(persona: &Persona, request: &ReviewRequest, hits: &[SearchHit]) -> String {
    let snapshot = &request.snapshot;
    let mut prompt = String::new();

    match persona.reviewer.specialty.as_str() {
        "visual" => {
            prompt.push_str(&format!(
                "Review the visual presentation of the profile @{}.\n",
                snapshot.handle
            ));
            match &snapshot.avatar_url {
                Some(url) => prompt.push_str(&format!("Profile image: {url}\n")),
                None => prompt.push_str("The profile exposes no avatar image.\n"),
            }
        }
        "copy" => {
            if snapshot.captions.is_empty() {
                prompt.push_str(&format!(
                    "The profile @{} has no recent post captions to review.\n",
                    snapshot.handle
                ));
            } else {
                prompt.push_str(&format!(
                    "Below are the captions of the most recent posts from @{}:\n\n{}\n",
                    snapshot.handle,
                    snapshot.numbered_captions()
                ));
            }
        }
        "marketing" => {
            prompt.push_str(&format!(
                "Profile bio for @{}:\n'{}'\n",
                snapshot.handle, snapshot.biography
            ));
            if !hits.is_empty() {
                prompt.push_str(&format!(
                    "\nCompetitor search results in the same niche:\n{}\n",
                    render_hits(hits)
                ));
            }
        }
        _ => {
            // Unrecognized specialty gets the whole snapshot.
            prompt.push_str(&format!(
                "Profile @{}\nBio: '{}'\n\n{}\n",
                snapshot.handle,
                snapshot.biography,
                snapshot.numbered_captions()
            ));
        }
    }

    if !request.focus.is_empty() {
        prompt.push_str(&format!(
            "\nPay particular attention to: {}.\n",
            focus_list(&request.focus)
        ));
    }

    if let Some(context) = &request.context {
        prompt.push_str(&format!("\nAdditional context: {context}\n"));
    }

    prompt.push_str("\nGive your recommendations roast-style, but make them useful.\n");

    prompt
}

/// Assemble the final markdown report from the reviewer critiques.
pub fn render_report(request: &ReviewRequest, reports: &[ReviewerReport]) -> String {
    let snapshot = &request.snapshot;
    let mut out = String::new();

    out.push_str(&format!("# Profile Roast: @{}\n\n", snapshot.handle));
    out.push_str(&format!(
        "{} recent captions reviewed by {} reviewer(s).\n\n",
        snapshot.captions.len(),
        reports.len()
    ));

    for report in reports {
        out.push_str(&format!("## {}\n\n{}\n\n", report.reviewer_name, report.review));
    }

    if reports.len() > 1 {
        out.push_str(
            "## Where to Look\n\n\
             - Art direction: the visual identity and signature style\n\
             - Copywriting: caption texts and how they hold the audience\n\
             - Marketing: niche value and competitive positioning\n",
        );
    }

    out
}
