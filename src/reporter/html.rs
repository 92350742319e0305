//! HTML reporter: a self-contained page with a folder tree, description
//! panels and warning/error/search filters
//!
//! The initial markup reflects the rendered [`View`]; the embedded script
//! keeps toggling, selection and filtering working client-side on the same
//! class conventions.

use crate::describe::{Description, DocParam};
use crate::state::EmptyFolderPolicy;
use crate::view::{NodeView, View};

pub const DEFAULT_TITLE: &str = "treedoc";

/// Escapes serialized JSON for embedding inside a `<script>` block.
/// Markup-significant characters only occur inside JSON strings, where the
/// `\uXXXX` forms are equivalent.
fn escape_json_for_script(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes text and attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Reporter that generates a self-contained HTML page
pub struct HtmlReporter {
    title: String,
}

impl HtmlReporter {
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Generate the full HTML page
    pub fn report(&self, view: &View) -> String {
        let mut html = String::with_capacity(16_384);
        html.push_str(&Self::template_head(&self.title));
        self.push_header(&mut html, view);
        self.push_controls(&mut html, view);

        html.push_str("  <div class=\"main\"><ul class=\"tree\">\n");
        self.push_node(&mut html, view, view.root(), true);
        html.push_str("  </ul></div>\n");

        html.push_str("  <div class=\"sidebar\">\n");
        for panel in view.panels() {
            if let Some(d) = view.tree().description(&panel.id) {
                self.push_description(&mut html, d, panel.visible);
            }
        }
        html.push_str("  </div>\n</div>\n");

        let highlight = serde_json::to_string(&view.highlight).unwrap_or_else(|_| "{}".to_string());
        html.push_str("<script>const HIGHLIGHT=");
        html.push_str(&escape_json_for_script(&highlight));
        html.push_str(";const HIDE_EMPTY=");
        html.push_str(if view.empty_folders == EmptyFolderPolicy::Hide {
            "true"
        } else {
            "false"
        });
        html.push_str(";</script>\n");
        html.push_str(Self::template_script());
        html.push_str("</body>\n</html>");
        html
    }

    fn push_header(&self, html: &mut String, view: &View) {
        let s = &view.summary;
        html.push_str(&format!(
            "  <header>\n    <h1>{}</h1>\n    <span class=\"meta\">{} items · <span class=\"c-warn\">{} warnings</span> · <span class=\"c-err\">{} errors</span></span>\n  </header>\n",
            escape_html(&self.title),
            s.items,
            s.warnings,
            s.errors
        ));
    }

    fn push_controls(&self, html: &mut String, view: &View) {
        let checked = |on: bool| if on { " checked" } else { "" };
        html.push_str("  <div class=\"controls\">\n");
        html.push_str(&format!(
            "    <label><input type=\"checkbox\" id=\"WarnCheckBox\" name=\"WarnCheckBox\"{}> Warnings</label>\n",
            checked(view.criteria.warnings)
        ));
        html.push_str(&format!(
            "    <label><input type=\"checkbox\" id=\"ErrCheckBox\" name=\"ErrCheckBox\"{}> Errors</label>\n",
            checked(view.criteria.errors)
        ));
        html.push_str(&format!(
            "    <input type=\"search\" class=\"search\" id=\"SearchInputBox\" name=\"SearchInputBox\" placeholder=\"Search…\" autocomplete=\"off\" value=\"{}\">\n",
            escape_html(view.criteria.search())
        ));
        html.push_str("  </div>\n");
    }

    fn push_node(&self, html: &mut String, view: &View, node: &NodeView, is_root: bool) {
        let hider = if node.hidden_by_filter { " filterHider" } else { "" };
        if node.is_folder {
            let kind = if is_root { "root" } else { "container" };
            html.push_str(&format!(
                "<li class=\"{}{}\"><span class=\"caret{}\">{}</span><ul class=\"nested{}\">\n",
                kind,
                hider,
                if node.expanded { " caret-down" } else { "" },
                escape_html(&node.name),
                if node.expanded { " active" } else { "" },
            ));
            for child in view.children(node) {
                self.push_node(html, view, child, false);
            }
            html.push_str("</ul></li>\n");
            return;
        }

        let mut classes = String::from("item");
        if node.tags.has_warning {
            classes.push_str(" haswarn");
        }
        if node.tags.has_error {
            classes.push_str(" haserr");
        }
        let style = if node.highlighted {
            format!(
                " style=\"background: {}; color: {};\"",
                escape_html(&view.highlight.background),
                escape_html(&view.highlight.foreground)
            )
        } else {
            String::new()
        };
        html.push_str(&format!(
            "<li class=\"leaf{}\"><span class=\"{}\" data-description=\"{}\"{}>{}</span></li>\n",
            hider,
            classes,
            escape_html(&node.path),
            style,
            escape_html(&node.name)
        ));
    }

    fn push_description(&self, html: &mut String, d: &Description, visible: bool) {
        html.push_str(&format!(
            "<div class=\"description\" id=\"{}\"{}>\n<h3>{}</h3>\n",
            escape_html(&d.id),
            if visible { "" } else { " style=\"display: none;\"" },
            escape_html(&d.id)
        ));

        if d.description.trim().is_empty() {
            html.push_str("<p class=\"warn\">Missing description</p>\n");
        } else {
            html.push_str(&format!("<p>{}</p>\n", escape_html(&d.description)));
        }
        if let Some(err) = &d.error {
            html.push_str(&format!("<div class=\"err\">{}</div>\n", escape_html(err)));
        }
        if let Some(w) = &d.parse_warning {
            html.push_str(&format!("<div class=\"warn\">{}</div>\n", escape_html(w)));
        }

        Self::push_params(html, "Input", &d.inputs);
        Self::push_params(html, "Output", &d.outputs);
        Self::push_params(html, "Test parameters", &d.test_params);

        html.push_str("<dl>");
        if let Some(t) = &d.load_time {
            html.push_str(&format!("<dt>Loaded</dt><dd>{}</dd>", escape_html(t)));
        }
        html.push_str(&format!("<dt>Timeout</dt><dd>{}</dd>", escape_html(&d.timeout)));
        html.push_str(&format!("<dt>Test pass</dt><dd>{}</dd>", d.test_pass));
        if let Some(t) = &d.test_duration {
            html.push_str(&format!("<dt>Test duration</dt><dd>{}</dd>", escape_html(t)));
        }
        html.push_str("</dl>\n");

        if let Some(result) = &d.test_result {
            html.push_str(&format!(
                "<details><summary>Test result</summary><pre class=\"code\">{}</pre></details>\n",
                escape_html(result)
            ));
        }
        html.push_str("</div>\n");
    }

    fn push_params(html: &mut String, heading: &str, params: &[DocParam]) {
        if params.is_empty() {
            return;
        }
        html.push_str(&format!(
            "<h4>{}</h4><table class=\"table\"><thead><tr><th>Name</th><th>Description</th><th>Warning</th></tr></thead><tbody>",
            heading
        ));
        for p in params {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td class=\"warn\">{}</td></tr>",
                escape_html(&p.name),
                escape_html(&p.description),
                escape_html(p.warning.as_deref().unwrap_or(""))
            ));
        }
        html.push_str("</tbody></table>\n");
    }

    // ─── HTML template pieces ────────────────────────────────────────────

    fn template_head(title: &str) -> String {
        format!(
            r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
<style>
:root{{--bg:#0d0d11;--surface:#16161b;--border:#2a2a32;--text:#e4e4e7;--muted:#71717a;--yellow:#eab308;--red:#ef4444;--blue:#3b82f6;--radius:8px}}
*{{box-sizing:border-box;margin:0;padding:0}}
body{{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,Oxygen,sans-serif;background:var(--bg);color:var(--text);line-height:1.5;min-height:100vh}}

/* ── Layout ── */
.shell{{display:grid;grid-template-columns:minmax(0,1fr) minmax(0,1.4fr);grid-template-rows:auto auto 1fr;min-height:100vh}}
@media(max-width:960px){{.shell{{grid-template-columns:1fr}}}}
header{{grid-column:1/-1;padding:1.25rem 1.5rem;border-bottom:1px solid var(--border);display:flex;align-items:center;gap:1.5rem;flex-wrap:wrap}}
header h1{{font-size:1.125rem;font-weight:700}}
header .meta{{font-size:.8125rem;color:var(--muted)}}
.controls{{grid-column:1/-1;padding:1rem 1.5rem;border-bottom:1px solid var(--border);display:flex;gap:1rem;align-items:center;font-size:.8125rem}}
.search{{background:var(--surface);border:1px solid var(--border);border-radius:var(--radius);padding:.5rem .75rem;color:var(--text);width:220px;outline:none}}
.search:focus{{border-color:var(--blue)}}
.main{{padding:1rem 1.5rem;overflow-y:auto}}
.sidebar{{border-left:1px solid var(--border);padding:1rem 1.25rem;overflow-y:auto;background:var(--surface)}}

/* ── Tree ── */
ul.tree,ul.nested{{list-style:none}}
ul.nested{{padding-left:1.25rem;display:none}}
ul.nested.active{{display:block}}
.caret{{cursor:pointer;user-select:none;font-weight:600}}
.caret::before{{content:"\25B6";color:var(--muted);display:inline-block;margin-right:6px;font-size:.625rem;transition:transform .2s}}
.caret-down::before{{transform:rotate(90deg)}}
.item{{cursor:pointer;padding:1px 6px;border-radius:4px}}
.item.haswarn{{color:var(--yellow)}}
.item.haserr{{color:var(--red)}}
.filterHider{{display:none}}

/* ── Description panels ── */
.description h3{{font-size:1rem;margin-bottom:.5rem}}
.description h4{{font-size:.8125rem;margin:.75rem 0 .25rem;color:var(--muted);text-transform:uppercase}}
.description dl{{display:grid;grid-template-columns:auto 1fr;gap:.25rem .75rem;margin-top:.75rem;font-size:.8125rem}}
.description dt{{color:var(--muted)}}
.table{{width:100%;border-collapse:collapse;font-size:.8125rem}}
.table th,.table td{{text-align:left;padding:.35rem .5rem;border-bottom:1px solid var(--border)}}
.code{{font-family:'SF Mono',Consolas,monospace;white-space:pre-wrap;margin-top:.5rem;font-size:.75rem}}
.warn,.c-warn{{color:var(--yellow)}}
.err,.c-err{{color:var(--red)}}
</style>
</head>
<body>
<div class="shell">
"##,
            escape_html(title)
        )
    }

    fn template_script() -> &'static str {
        r##"<script>
(function(){
"use strict";

/* ── helpers ── */
const $=s=>document.querySelector(s);
const $$=(s,root)=>[...(root||document).querySelectorAll(s)];

/* ── folders ── */
function toggleFolder(caret){
  const nested=caret.parentElement.querySelector('.nested');
  if(nested) nested.classList.toggle('active');
  caret.classList.toggle('caret-down');
}

/* ── description panels ── */
function selectDescription(id,item){
  for(const panel of $$('.description')){
    panel.style.display=panel.id===id?'':'none';
  }
  for(const el of $$('.item')){
    el.style.background='';
    el.style.color='';
  }
  item.style.background=HIGHLIGHT.background;
  item.style.color=HIGHLIGHT.foreground;
}

/* ── filter ── */
function applyFilter(){
  const warn=$('#WarnCheckBox').checked;
  const err=$('#ErrCheckBox').checked;
  const search=$('#SearchInputBox').value.trim().toLowerCase();
  const active=warn||err||search!=='';
  for(const folder of $$('.container, .root')){
    const items=$$('.item',folder);
    let found=false;
    for(const item of items){
      const ok=!active||(
        (!warn||item.classList.contains('haswarn'))&&
        (!err||item.classList.contains('haserr'))&&
        (search===''||item.textContent.toLowerCase().includes(search)));
      item.parentElement.classList.toggle('filterHider',!ok);
      if(ok) found=true;
    }
    const show=items.length?(!active||found):(!active&&!HIDE_EMPTY);
    folder.classList.toggle('filterHider',!show);
  }
}

/* ── events ── */
document.addEventListener('click',e=>{
  const caret=e.target.closest('.caret');
  if(caret){toggleFolder(caret);return}
  const item=e.target.closest('.item');
  if(item) selectDescription(item.dataset.description,item);
});
$('#WarnCheckBox').addEventListener('change',applyFilter);
$('#ErrCheckBox').addEventListener('change',applyFilter);
$('#SearchInputBox').addEventListener('input',applyFilter);

})();
</script>
"##
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}
