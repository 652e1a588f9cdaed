use crate::config::GoalConfig;

pub fn render_dashboard(goals: &GoalConfig) -> String {
    DASHBOARD_HTML
        .replace("{{DAILY_GOAL}}", &goals.daily_goal.to_string())
        .replace("{{WEEKLY_GOAL}}", &goals.weekly_goal.to_string())
}

const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Job Application Dashboard</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1080px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
    }

    h2 {
      margin: 0 0 10px;
      font-size: 1.1rem;
    }

    .quote {
      margin: 6px 0 0;
      color: #5f5c57;
      font-style: italic;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .goal-track {
      background: rgba(47, 72, 88, 0.1);
      border-radius: 999px;
      overflow: hidden;
      height: 26px;
    }

    .goal-bar {
      height: 100%;
      color: white;
      font-size: 0.85rem;
      font-weight: 600;
      display: flex;
      align-items: center;
      padding: 0 10px;
      white-space: nowrap;
      transition: width 300ms ease;
    }

    .bg-success { background: #2e9e5b; }
    .bg-primary { background: #2f6fb0; }
    .bg-warning { background: #e0a526; }
    .bg-info { background: #38a3b8; }
    .bg-secondary { background: #9a9a9a; }

    .charts {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(300px, 1fr));
      gap: 16px;
    }

    .chart-label {
      font-size: 11px;
      fill: #6b645d;
    }

    .chart-grid {
      stroke: rgba(47, 72, 88, 0.1);
    }

    .chart-line {
      fill: rgba(75, 192, 192, 0.2);
      stroke: rgb(75, 192, 192);
      stroke-width: 2.5;
    }

    .chart-point {
      fill: rgb(75, 192, 192);
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font-size: 0.95rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent-2);
      color: white;
    }

    .status {
      min-height: 20px;
      font-size: 0.9rem;
      color: #6b645d;
    }

    .status[data-type="error"] {
      color: #c2412d;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Job Application Dashboard</h1>
      <p id="motivationalQuote" class="quote">Loading motivational quote...</p>
    </header>

    <section class="panel">
      <div class="stat"><span class="label">Jobs scraped (24h)</span><span id="jobsScraped24h" class="value">0</span></div>
      <div class="stat"><span class="label">Applications today</span><span id="applicationsToday" class="value">0</span></div>
      <div class="stat"><span class="label">Applications this week</span><span id="applicationsThisWeek" class="value">0</span></div>
      <div class="stat"><span class="label">Total applications</span><span id="totalApplications" class="value">0</span></div>
      <div class="stat"><span class="label">Resumes today</span><span id="resumesCreatedToday" class="value">0</span></div>
      <div class="stat"><span class="label">Resumes total</span><span id="totalResumesCreated" class="value">0</span></div>
      <div class="stat"><span class="label">Cover letters today</span><span id="coverLettersCreatedToday" class="value">0</span></div>
      <div class="stat"><span class="label">Cover letters total</span><span id="totalCoverLettersCreated" class="value">0</span></div>
    </section>

    <section class="panel">
      <div class="stat">
        <span class="label">Daily goal</span>
        <div class="goal-track"><div id="dailyGoalProgress" class="goal-bar bg-info" style="width: 0%">0% (0 / {{DAILY_GOAL}})</div></div>
      </div>
      <div class="stat">
        <span class="label">Weekly goal</span>
        <div class="goal-track"><div id="weeklyGoalProgress" class="goal-bar bg-info" style="width: 0%">0% (0 / {{WEEKLY_GOAL}})</div></div>
        <button id="resetWeekly" type="button">Reset weekly progress</button>
      </div>
    </section>

    <section class="charts">
      <div class="stat"><h2>Application Status</h2><svg id="applicationStatusChart" viewBox="0 0 320 220" role="img"></svg></div>
      <div class="stat"><h2>Applications by Source</h2><svg id="applicationsBySourceChart" viewBox="0 0 320 220" role="img"></svg></div>
      <div class="stat"><h2>Applications per Day</h2><svg id="applicationsOverTimeChart" viewBox="0 0 320 220" role="img"></svg></div>
    </section>

    <div class="status" id="status"></div>
  </main>
  <script>
    const GOALS = Object.freeze({ dailyGoal: {{DAILY_GOAL}}, weeklyGoal: {{WEEKLY_GOAL}} });
    const STATS_ERROR = 'Error loading dashboard data. Please try again later.';
    const NO_DATA = 'No Data';
    const PLACEHOLDER_COLOR = 'rgba(200, 200, 200, 0.2)';
    const PALETTE = [
      'rgba(255, 99, 132, 0.7)', 'rgba(54, 162, 235, 0.7)', 'rgba(255, 206, 86, 0.7)',
      'rgba(75, 192, 192, 0.7)', 'rgba(153, 102, 255, 0.7)', 'rgba(255, 159, 64, 0.7)',
      'rgba(199, 199, 199, 0.7)', 'rgba(83, 102, 83, 0.7)'
    ];
    const KPI_FIELDS = {
      jobsScraped24h: 'jobs_scraped_last_24_hours',
      applicationsToday: 'applications_today',
      applicationsThisWeek: 'applications_this_week',
      totalApplications: 'total_applications',
      resumesCreatedToday: 'resumes_created_today',
      totalResumesCreated: 'resumes_created_total',
      coverLettersCreatedToday: 'cover_letters_created_today',
      totalCoverLettersCreated: 'cover_letters_created_total'
    };
    const statusEl = document.getElementById('status');
    const quoteEl = document.getElementById('motivationalQuote');
    const slots = new Map();

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const svg = (tag, attrs, text) => {
      const el = document.createElementNS('http://www.w3.org/2000/svg', tag);
      Object.entries(attrs).forEach(([key, value]) => el.setAttribute(key, value));
      if (text !== undefined) {
        el.textContent = text;
      }
      return el;
    };

    const drawLine = (canvas, data) => {
      const width = 320, height = 220, padX = 34, padY = 28, top = 14;
      const max = Math.max(1, ...data.values);
      const step = Math.max(1, Math.ceil(max / 10));
      const axisMax = Math.ceil(max / step) * step;
      const xStep = data.values.length > 1 ? (width - padX * 2) / (data.values.length - 1) : 0;
      const x = (i) => padX + i * xStep;
      const y = (v) => height - padY - (v / axisMax) * (height - top - padY);
      for (let v = 0; v <= axisMax; v += step) {
        canvas.appendChild(svg('line', { class: 'chart-grid', x1: padX, y1: y(v), x2: width - padX, y2: y(v) }));
        canvas.appendChild(svg('text', { class: 'chart-label', x: padX - 6, y: y(v) + 4, 'text-anchor': 'end' }, v));
      }
      const path = data.values.map((v, i) => `${i === 0 ? 'M' : 'L'} ${x(i)} ${y(v)}`).join(' ');
      canvas.appendChild(svg('path', { class: 'chart-line', d: `${path} L ${x(data.values.length - 1)} ${y(0)} L ${x(0)} ${y(0)} Z` }));
      data.values.forEach((v, i) => {
        canvas.appendChild(svg('circle', { class: 'chart-point', cx: x(i), cy: y(v), r: 3.5 }));
        canvas.appendChild(svg('text', { class: 'chart-label', x: x(i), y: height - padY + 16, 'text-anchor': 'middle' }, data.labels[i]));
      });
    };

    const drawPie = (canvas, data, hole) => {
      const cx = 110, cy = 110, r = 90;
      const total = data.values.reduce((sum, v) => sum + v, 0) || 1;
      let angle = -Math.PI / 2;
      data.values.forEach((v, i) => {
        const sweep = (v / total) * Math.PI * 2;
        const end = angle + Math.min(sweep, Math.PI * 2 - 0.0001);
        const large = sweep > Math.PI ? 1 : 0;
        const d = `M ${cx} ${cy} L ${cx + r * Math.cos(angle)} ${cy + r * Math.sin(angle)} ` +
          `A ${r} ${r} 0 ${large} 1 ${cx + r * Math.cos(end)} ${cy + r * Math.sin(end)} Z`;
        canvas.appendChild(svg('path', { d, fill: data.colors[i], stroke: 'white' }));
        angle += sweep;
      });
      if (hole) {
        canvas.appendChild(svg('circle', { cx, cy, r: r * 0.55, fill: 'white' }));
      }
    };

    const drawLegend = (canvas, data, kind) => {
      const entries = kind === 'line' ? [[data.label, data.colors[0]]] : data.labels.map((l, i) => [`${l} (${data.values[i]})`, data.colors[i]]);
      entries.forEach(([label, color], i) => {
        canvas.appendChild(svg('rect', { x: 226, y: 16 + i * 18, width: 10, height: 10, fill: color }));
        canvas.appendChild(svg('text', { class: 'chart-label', x: 240, y: 25 + i * 18 }, label));
      });
    };

    // One live chart per slot: the previous chart is destroyed before a new one binds the canvas.
    const renderChart = (slot, canvasId, kind, label, labels, values) => {
      const previous = slots.get(slot);
      if (previous) {
        previous.destroy();
        slots.delete(slot);
      }
      const empty = labels.length === 0;
      const data = empty
        ? { label, labels: [NO_DATA], values: [1], colors: [PLACEHOLDER_COLOR] }
        : { label, labels, values, colors: labels.map((_, i) => PALETTE[i % PALETTE.length]) };
      const canvas = document.getElementById(canvasId);
      if (empty) {
        drawPie(canvas, data, false);
        canvas.appendChild(svg('text', { class: 'chart-label', x: 110, y: 114, 'text-anchor': 'middle' }, NO_DATA));
      } else if (kind === 'line') {
        drawLine(canvas, data);
      } else {
        drawPie(canvas, data, kind === 'doughnut');
      }
      if (!empty) {
        drawLegend(canvas, data, kind);
      }
      slots.set(slot, { destroy: () => canvas.replaceChildren() });
    };

    const updateGoal = (elementId, current, goal) => {
      const bar = document.getElementById(elementId);
      current = current || 0;
      const pct = goal > 0 ? Math.min((current / goal) * 100, 100) : 0;
      const tier = goal <= 0 ? 'bg-secondary' : pct >= 100 ? 'bg-success' : pct >= 75 ? 'bg-primary' : pct >= 50 ? 'bg-warning' : 'bg-info';
      bar.classList.remove('bg-success', 'bg-primary', 'bg-warning', 'bg-info', 'bg-secondary');
      bar.classList.add(tier);
      bar.style.width = `${Math.max(pct, 12)}%`;
      bar.setAttribute('aria-valuenow', current);
      bar.textContent = `${Math.round(pct)}% (${current} / ${goal})`;
    };

    const applyStats = (data) => {
      Object.entries(KPI_FIELDS).forEach(([id, field]) => {
        document.getElementById(id).textContent = data[field] ?? 0;
      });
      updateGoal('dailyGoalProgress', data.applications_today, GOALS.dailyGoal);
      updateGoal('weeklyGoalProgress', data.applications_this_week, GOALS.weeklyGoal);
      const status = data.application_status_breakdown || {};
      const source = data.applications_by_source || {};
      const days = data.applications_last_7_days || [];
      renderChart('status', 'applicationStatusChart', 'doughnut', 'Application Status', Object.keys(status), Object.values(status));
      renderChart('source', 'applicationsBySourceChart', 'pie', 'Applications by Source', Object.keys(source), Object.values(source));
      renderChart('time', 'applicationsOverTimeChart', 'line', 'Applications per Day', days.map((d) => d.date.substring(5)), days.map((d) => d.count));
    };

    const getJson = async (url) => {
      const res = await fetch(url);
      if (!res.ok) {
        throw new Error(`HTTP error! status: ${res.status}`);
      }
      return res.json();
    };

    const loadStats = (cycle) => getJson('/api/dashboard_stats')
      .then((data) => {
        applyStats(data || {});
        return 'ok';
      })
      .catch((err) => {
        console.error('Error fetching dashboard stats:', err);
        cycle.statsFailed = true;
        applyStats({});
        quoteEl.textContent = STATS_ERROR;
        return 'failed';
      });

    // A failed stats fetch owns the quote region for the rest of the cycle.
    const showQuote = (cycle, text) => {
      if (!cycle.statsFailed) {
        quoteEl.textContent = text;
      }
    };

    const loadQuote = (cycle) => getJson('/api/quote')
      .then((data) => {
        showQuote(cycle, data.quote && data.author ? `"${data.quote}" - ${data.author}` : 'Keep pushing, you are doing great!');
        return 'ok';
      })
      .catch((err) => {
        console.error('Error fetching motivational quote:', err);
        showQuote(cycle, 'Stay motivated! (Error fetching quote)');
        return 'failed';
      });

    const refresh = async () => {
      const cycle = { statsFailed: false };
      const [stats, quote] = await Promise.all([loadStats(cycle), loadQuote(cycle)]);
      if (stats === 'failed') {
        setStatus('Could not load statistics.', 'error');
      } else if (quote === 'failed') {
        setStatus('Statistics loaded; quote unavailable.', 'info');
      } else {
        setStatus('', '');
      }
    };

    document.getElementById('resetWeekly').addEventListener('click', async () => {
      try {
        const res = await fetch('/api/reset_weekly_progress', { method: 'POST' });
        if (!res.ok) {
          throw new Error(`HTTP error! status: ${res.status}`);
        }
        await refresh();
      } catch (err) {
        console.error('Error resetting weekly progress:', err);
        setStatus('Could not reset weekly progress.', 'error');
      }
    });

    refresh();
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goals_are_embedded_once_per_placeholder() {
        let page = render_dashboard(&GoalConfig::new(7, 35));
        assert!(page.contains("dailyGoal: 7, weeklyGoal: 35"));
        assert!(page.contains("0% (0 / 7)"));
        assert!(!page.contains("{{DAILY_GOAL}}"));
        assert!(!page.contains("{{WEEKLY_GOAL}}"));
    }

    #[test]
    fn page_shows_stats_error_in_quote_region_and_handles_reset_failures() {
        let page = render_dashboard(&GoalConfig::default());
        assert!(page.contains("const STATS_ERROR = 'Error loading dashboard data. Please try again later.';"));
        assert!(page.contains("quoteEl.textContent = STATS_ERROR;"));
        assert!(page.contains("setStatus('Could not reset weekly progress.', 'error');"));
        assert!(page.contains("} catch (err) {"));
        assert!(!page.contains("sessionStorage"));
    }
}
