//! REST API endpoint handlers.
//!
//! Handlers are thin command orchestrators: load aggregates from the
//! store, run the engine rule, write back, respond. Collaborator calls
//! happen between lock scopes so an LLM round-trip never blocks another
//! user's request on a held record.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/skills/{user_id}` | Skill list + ledger summary |
//! | `POST` | `/api/skills` | Create a skill |
//! | `PUT` | `/api/skills/{id}` | Update name/target/resources/prereqs |
//! | `DELETE` | `/api/skills/{id}` | Delete a skill |
//! | `POST` | `/api/skills/batch` | Batch-add from suggestions |
//! | `GET` | `/api/shop/items` | Shop catalog |
//! | `POST` | `/api/shop/buy` | Purchase an item |
//! | `POST` | `/api/shop/equip` | Equip an owned item |
//! | `POST` | `/api/users/penalize` | Apply an XP penalty |
//! | `POST` | `/api/challenges/start` | Open a challenge session |
//! | `POST` | `/api/challenges/{id}/hint` | Buy the next hint |
//! | `POST` | `/api/challenges/{id}/submit` | Submit a solution |
//! | `POST` | `/api/challenges/{id}/visibility` | Report a hidden tab |
//! | `POST` | `/api/ai/skill-gap` | Role gap analysis |
//! | `POST` | `/api/ai/recommend-resources` | Append recommended resources |

pub mod advisory;
pub mod sessions;
pub mod shop;
pub mod skills;

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;

use crate::state::AppState;

/// Serve a minimal HTML page showing server status and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let live_sessions = state.sessions.read().await.len();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>SkillForge API</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .status {{ color: #3fb950; font-weight: bold; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
    </style>
</head>
<body>
    <h1>SkillForge API</h1>
    <p class="subtitle">Skill mastery &amp; progression engine</p>
    <p>Status: <span class="status">RUNNING</span> &mdash; {live_sessions} live challenge session(s)</p>
    <h2>Endpoints</h2>
    <ul>
        <li>GET <a href="/api/shop/items">/api/shop/items</a> &mdash; shop catalog</li>
        <li>GET /api/skills/:user_id &mdash; skills + ledger summary</li>
        <li>POST /api/skills &mdash; create a skill</li>
        <li>POST /api/challenges/start &mdash; open a challenge session</li>
        <li>POST /api/ai/skill-gap &mdash; role gap analysis</li>
    </ul>
</body>
</html>"#
    ))
}
