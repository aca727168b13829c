use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::evidence::{EvidenceSource, load_corpus, seed_evidence};
use crate::components::knowledge_graph::{CancelToken, GraphStatus, KnowledgeGraphCanvas};
use crate::net;

fn current_year() -> i32 {
	js_sys::Date::new_0().get_full_year() as i32
}

/// Evidence Explorer: the interactive knowledge graph plus the literature
/// corpus with seeded fill for missing fields.
#[component]
pub fn EvidenceExplorer() -> impl IntoView {
	let graph_status = RwSignal::new(GraphStatus::Loading);
	let (search, set_search) = signal(String::new());
	let (corpus, set_corpus) = signal(Vec::<EvidenceSource>::new());
	let (corpus_loading, set_corpus_loading) = signal(true);
	let (corpus_note, set_corpus_note) = signal(Option::<String>::None);

	let cancel = CancelToken::new();
	{
		let cancel = cancel.clone();
		on_cleanup(move || cancel.cancel());
	}
	spawn_local(async move {
		let result = load_corpus(current_year(), async |url: &str| {
			net::fetch_text(url).await
		})
		.await;
		let Some(result) = cancel.admit(result) else {
			return;
		};
		set_corpus_loading.set(false);
		match result {
			Ok(records) => set_corpus.set(records),
			Err(err) => set_corpus_note.set(Some(err.to_string())),
		}
	});

	// Corpus when available, seed records otherwise; filtered live.
	let displayed = Memo::new(move |_| {
		let records = corpus.get();
		let records = if records.is_empty() {
			seed_evidence(current_year())
		} else {
			records
		};
		let query = search.get().trim().to_lowercase();
		if query.is_empty() {
			return records;
		}
		records
			.into_iter()
			.filter(|source| {
				source.title.to_lowercase().contains(&query)
					|| source.journal.to_lowercase().contains(&query)
					|| source.authors.to_lowercase().contains(&query)
					|| source.tags.iter().any(|tag| tag.contains(&query))
			})
			.collect()
	});

	view! {
		<div class="evidence-explorer">
			<header class="page-header">
				<div>
					<h1>"Evidence Explorer"</h1>
					<p class="subtitle">"Interactive knowledge graph and literature analysis"</p>
				</div>
				<input
					type="search"
					class="evidence-search"
					placeholder="Search evidence..."
					prop:value=move || search.get()
					on:input=move |ev| set_search.set(event_target_value(&ev))
				/>
			</header>

			<section class="card graph-card">
				<h2>"Interactive Knowledge Graph"</h2>
				<p class="card-description">"Explore relationships discovered in your uploaded graph"</p>
				<div class="graph-frame">
					<KnowledgeGraphCanvas status=graph_status />
					<div class="status-pill">
						{move || match graph_status.get() {
							GraphStatus::Loading => {
								view! { <span class="pulse">"Loading graph…"</span> }.into_any()
							}
							GraphStatus::Ready(meta) => {
								view! {
									<span>
										{format!("{} nodes • {} edges", meta.node_count, meta.edge_count)}
									</span>
								}
								.into_any()
							}
							GraphStatus::Fallback { message, .. } => {
								view! { <span class="error">{format!("Error: {message}")}</span> }
									.into_any()
							}
						}}
					</div>
					<div class="legend">
						"Node size ∝ degree • Hover to highlight links"
					</div>
				</div>
			</section>

			<section class="card literature-card">
				<div class="literature-header">
					<h2>{move || format!("Evidence Sources ({})", displayed.get().len())}</h2>
					<div class="corpus-status">
						{move || {
							if corpus_loading.get() {
								view! { <span class="pulse">"Loading corpus…"</span> }.into_any()
							} else if let Some(note) = corpus_note.get() {
								view! { <span class="muted">{note}</span> }.into_any()
							} else {
								view! {
									<span>{format!("Loaded {} docs from corpus", corpus.get().len())}</span>
								}
								.into_any()
							}
						}}
					</div>
				</div>

				{move || {
					displayed
						.get()
						.into_iter()
						.map(|source| {
							view! {
								<article class="evidence-card">
									<div class="evidence-title-row">
										<h3>{source.title.clone()}</h3>
										<span class="badge quality">
											{format!("{}%", (source.quality_score * 100.0).round())}
										</span>
										<span class="badge">{source.evidence_type.clone()}</span>
									</div>
									<p class="evidence-byline">
										{format!("{} • {} • {}", source.authors, source.journal, source.year)}
									</p>
									<p class="evidence-findings">{source.key_findings.clone()}</p>
									<div class="evidence-tags">
										{source
											.tags
											.iter()
											.map(|tag| view! { <span class="tag">{tag.clone()}</span> })
											.collect_view()}
									</div>
									<div class="evidence-footer">
										<span>{format!("{} citations", source.citation_count)}</span>
										<span>
											{format!("{}% relevant", (source.relevance_score * 100.0).round())}
										</span>
										<a href=source.url.clone() target="_blank" rel="noreferrer">
											"Open"
										</a>
									</div>
								</article>
							}
						})
						.collect_view()
				}}
			</section>
		</div>
	}
}
