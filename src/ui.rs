use crate::config::ChallengeConfig;
use crate::goals::{CardioGroup, Category};
use crate::models::UserProfile;
use crate::progress::ProgressReport;
use chrono::Local;

pub fn render_dashboard(
    config: &ChallengeConfig,
    participant: Option<(&UserProfile, &ProgressReport)>,
) -> String {
    let current_week = config.current_week(Local::now().date_naive());
    let subtitle = format!(
        "Week {current_week} of {} &middot; started {}",
        config.weeks, config.start_date
    );

    let body = match participant {
        Some((user, report)) => render_participant(config, user, report),
        None => EMPTY_BODY.to_string(),
    };

    INDEX_HTML
        .replace("{{SUBTITLE}}", &subtitle)
        .replace("{{BODY}}", &body)
}

fn render_participant(config: &ChallengeConfig, user: &UserProfile, report: &ProgressReport) -> String {
    let rank_line = match (&report.next_rank, report.gap_to_next) {
        (Some(next), Some(gap)) => format!(
            "You are {gap:.1}% away from the next rank: {}.",
            html_escape::encode_text(&next.name)
        ),
        _ => "You have reached the highest rank!".to_string(),
    };

    let goals = &config.goals;
    let totals = &report.week_totals;
    let mut cards = String::new();
    for category in Category::CHECK_ORDER {
        let detail = match category {
            Category::Recovery => format!("{:.0} / {:.0} min", totals.recovery_minutes, goals.recovery_minutes),
            Category::Strength => format!("{:.0} / {:.0} lbs", totals.strength_lbs, goals.strength_lbs),
            Category::Hiit => format!("{:.0} / {:.0} min", totals.hiit_minutes, goals.hiit_minutes),
            Category::Cardio => CardioGroup::ALL
                .iter()
                .map(|&group| {
                    format!(
                        "{} {:.1}/{:.0} {}",
                        group.label(),
                        totals.cardio.get(group),
                        goals.cardio.goal(group),
                        group.unit()
                    )
                })
                .collect::<Vec<_>>()
                .join("<br />"),
        };
        cards.push_str(&progress_card(
            category.display_name(),
            report.week_percentages.get(category),
            &detail,
        ));
    }

    format!(
        r#"<section class="overall">
      <h2>{name}</h2>
      <p class="rank">{rank}</p>
      {overall}
      <p class="hint">{rank_line}</p>
    </section>
    <h3>Week {week}</h3>
    <section class="panel">{cards}</section>"#,
        name = html_escape::encode_text(&user.display_name),
        rank = html_escape::encode_text(&report.rank.name),
        overall = progress_card("Challenge progress", report.overall, "Average across logged weeks"),
        week = report.week,
    )
}

/// Bars are capped at 100% for display; the number shows the real value.
fn progress_card(label: &str, percent: f64, detail: &str) -> String {
    let width = percent.clamp(0.0, 100.0);
    let state = if percent >= 100.0 { "done" } else { "open" };
    format!(
        r#"<div class="stat {state}">
        <span class="label">{label}</span>
        <span class="value">{percent:.1}%</span>
        <div class="bar"><div style="width: {width:.1}%"></div></div>
        <span class="detail">{detail}</span>
      </div>"#
    )
}

const EMPTY_BODY: &str = r#"<p class="hint">Open <code>/?user=&lt;id&gt;</code> to see a participant's progress.</p>"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Challenge Tracker</title>
  <style>
    :root {
      --ink: #1f2a24;
      --accent: #3c6e47;
      --done: #c9a227;
      --card: #ffffff;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, #eef2ea, #d9e3d2);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px;
    }

    .app {
      width: min(860px, 100%);
      display: grid;
      gap: 20px;
    }

    h1, h2, h3 {
      margin: 0;
    }

    .subtitle, .hint, .rank {
      margin: 0;
      color: #5b6660;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .stat {
      background: var(--card);
      border-radius: 16px;
      padding: 16px;
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
    }

    .stat .value {
      font-size: 1.6rem;
      font-weight: 600;
    }

    .stat .detail {
      font-size: 0.85rem;
      color: #5b6660;
    }

    .bar {
      height: 8px;
      border-radius: 999px;
      background: #e3e8e0;
      overflow: hidden;
    }

    .bar div {
      height: 100%;
      background: var(--accent);
    }

    .stat.done .bar div {
      background: var(--done);
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Challenge Tracker</h1>
      <p class="subtitle">{{SUBTITLE}}</p>
    </header>
    {{BODY}}
  </main>
</body>
</html>
"#;
