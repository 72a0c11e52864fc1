//! LaTeX document rendering
//!
//! Produces the résumé and cover-letter `.tex` sources from the adapted
//! profile. Rendering is deterministic: the same inputs yield byte-identical
//! markup (the date line is the `\today` macro, resolved at compile time).
//! All user-originated text passes through [`escape_latex`] exactly once,
//! here and nowhere else.

use crate::analysis::language::Language;
use crate::input::posting::{ColorPair, Rgb};
use crate::processing::adapter::AdaptedProfile;
use crate::processing::composer::{CoverLetterContent, LetterPhrases};
use std::fmt::Write;
use std::path::Path;

/// Escape the nine LaTeX-reserved characters. Order-safe: the input is
/// walked once, so replacement text is never re-escaped.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str(r"\&"),
            '%' => out.push_str(r"\%"),
            '$' => out.push_str(r"\$"),
            '#' => out.push_str(r"\#"),
            '_' => out.push_str(r"\_"),
            '{' => out.push_str(r"\{"),
            '}' => out.push_str(r"\}"),
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            _ => out.push(c),
        }
    }
    out
}

/// Résumé section headings per output language.
struct Headings {
    babel: &'static str,
    experiences: &'static str,
    education: &'static str,
    skills: &'static str,
    projects: &'static str,
    certifications: &'static str,
    languages: &'static str,
    interests: &'static str,
}

const HEADINGS_FR: Headings = Headings {
    babel: "french",
    experiences: "EXPÉRIENCES",
    education: "FORMATIONS",
    skills: "COMPÉTENCES",
    projects: "PROJETS PERSONNELS",
    certifications: "CERTIFICATIONS",
    languages: "LANGUES",
    interests: "CENTRES D'INTÉRÊT",
};

const HEADINGS_EN: Headings = Headings {
    babel: "english",
    experiences: "EXPERIENCE",
    education: "EDUCATION",
    skills: "SKILLS",
    projects: "PERSONAL PROJECTS",
    certifications: "CERTIFICATIONS",
    languages: "LANGUAGES",
    interests: "INTERESTS",
};

impl Headings {
    fn for_language(language: Language) -> &'static Headings {
        match language {
            Language::Fr => &HEADINGS_FR,
            Language::En => &HEADINGS_EN,
        }
    }
}

const DEFAULT_PRIMARY: Rgb = Rgb { r: 30, g: 60, b: 114 };
const DEFAULT_SECONDARY: Rgb = Rgb { r: 212, g: 175, b: 55 };

pub struct DocumentRenderer;

impl DocumentRenderer {
    /// Render the résumé `.tex` source. Sections back by an empty list are
    /// omitted entirely, heading included.
    pub fn render_resume(adapted: &AdaptedProfile) -> String {
        let t = Headings::for_language(adapted.language);

        let mut experiences_tex = String::new();
        for exp in &adapted.experiences {
            if exp.selected_bullets.is_empty() {
                let _ = write!(
                    experiences_tex,
                    "\\cventry{{{}}}\n{{{}}}\n{{{}}}\n{{}}\n\n",
                    escape_latex(&exp.experience.title),
                    escape_latex(&exp.experience.company),
                    escape_latex(&exp.experience.period),
                );
            } else {
                let bullets = exp
                    .selected_bullets
                    .iter()
                    .map(|b| format!("    \\item {}", escape_latex(b)))
                    .collect::<Vec<_>>()
                    .join("\n");
                let _ = write!(
                    experiences_tex,
                    "\\cventry{{{}}}\n{{{}}}\n{{{}}}\n{{%\n\
                     \\begin{{itemize}}[leftmargin=*, noitemsep, topsep=0pt]\n\
                     {}\n\\end{{itemize}}\n}}\n\n",
                    escape_latex(&exp.experience.title),
                    escape_latex(&exp.experience.company),
                    escape_latex(&exp.experience.period),
                    bullets,
                );
            }
        }

        let mut education_tex = String::new();
        for edu in &adapted.education {
            let _ = write!(
                education_tex,
                "\\cventry{{{}}}\n{{{}}}\n{{{}}}\n{{}}\n\n",
                escape_latex(&edu.title),
                escape_latex(&edu.school),
                escape_latex(&edu.period),
            );
        }

        let mut skills_tex = String::new();
        for group in &adapted.skills {
            let _ = writeln!(
                skills_tex,
                "\\competence{{{}}}{{{}}}",
                escape_latex(&group.label),
                escape_latex(&group.items.join(", ")),
            );
        }

        let mut certifications_tex = String::new();
        for cert in &adapted.certifications {
            let _ = writeln!(
                certifications_tex,
                "\\certification{{{} ({})}}",
                escape_latex(&cert.certification.name),
                escape_latex(&cert.certification.date),
            );
        }

        let mut projects_tex = String::new();
        for project in &adapted.projects {
            let _ = write!(
                projects_tex,
                "\\noindent\\textbf{{{}}} \\hfill \\textcolor{{textgray}}{{\\small {}}}\\\\\n\
                 {{\\small {}}}\\\\[4pt]\n",
                escape_latex(&project.name),
                escape_latex(&project.technologies),
                escape_latex(&project.description),
            );
        }

        let mut languages_tex = String::new();
        for lang in &adapted.languages {
            let _ = writeln!(
                languages_tex,
                "\\certification{{\\small {} - {}}}",
                escape_latex(&lang.name),
                escape_latex(&lang.level),
            );
        }

        let mut interests_tex = String::new();
        for interest in &adapted.interests {
            let _ = writeln!(
                interests_tex,
                "\\certification{{\\small {}}}",
                escape_latex(interest),
            );
        }

        let mut body = String::new();
        let mut section = |heading: &str, content: &str| {
            if !content.is_empty() {
                let _ = write!(body, "\\cvsection{{{}}}\n{}\n", heading, content);
            }
        };
        section(t.experiences, &experiences_tex);
        section(t.education, &education_tex);
        section(t.skills, &skills_tex);
        section(t.projects, &projects_tex);
        section(t.certifications, &certifications_tex);

        let mut columns = String::new();
        if !languages_tex.is_empty() || !interests_tex.is_empty() {
            let _ = write!(
                columns,
                "\\noindent\n\
                 \\begin{{minipage}}[t]{{0.48\\linewidth}}\n\
                 \\cvsection{{{}}}\n\\vspace{{-2pt}}\n{}\\end{{minipage}}%\n\
                 \\hfill\n\
                 \\begin{{minipage}}[t]{{0.48\\linewidth}}\n\
                 \\cvsection{{{}}}\n\\vspace{{-2pt}}\n{}\\end{{minipage}}\n",
                t.languages, languages_tex, t.interests, interests_tex,
            );
        }

        format!(
            "\\documentclass[a4paper,10pt]{{article}}\n\n\
             \\usepackage[utf8]{{inputenc}}\n\
             \\usepackage[T1]{{fontenc}}\n\
             \\usepackage[{babel}]{{babel}}\n\
             \\usepackage{{lmodern}}\n\
             \\usepackage[sfdefault]{{roboto}}\n\
             \\usepackage{{geometry}}\n\
             \\usepackage{{xcolor}}\n\
             \\usepackage{{tikz}}\n\
             \\usepackage{{fontawesome5}}\n\
             \\usepackage{{enumitem}}\n\
             \\usepackage{{titlesec}}\n\
             \\usepackage{{hyperref}}\n\
             \\usepackage{{parskip}}\n\n\
             \\geometry{{left=0.5cm, right=0.8cm, top=0.4cm, bottom=0.4cm}}\n\n\
             \\definecolor{{maingreen}}{{RGB}}{{76, 175, 130}}\n\
             \\definecolor{{darkgreen}}{{RGB}}{{60, 140, 105}}\n\
             \\definecolor{{lightgray}}{{RGB}}{{245, 245, 245}}\n\
             \\definecolor{{textgray}}{{RGB}}{{80, 80, 80}}\n\n\
             \\pagestyle{{empty}}\n\n\
             \\hypersetup{{\n    colorlinks=true,\n    linkcolor=maingreen,\n    urlcolor=maingreen\n}}\n\n\
             \\newcommand{{\\cvsection}}[1]{{%\n\
             \x20   \\vspace{{5pt}}\n\
             \x20   \\noindent\\colorbox{{maingreen}}{{%\n\
             \x20       \\parbox{{\\dimexpr\\linewidth-2\\fboxsep}}{{%\n\
             \x20           \\textcolor{{white}}{{\\textbf{{\\normalsize #1}}}}%\n\
             \x20       }}%\n\
             \x20   }}%\n\
             \x20   \\vspace{{4pt}}\n\
             }}\n\n\
             \\newcommand{{\\cventry}}[4]{{%\n\
             \x20   \\noindent\\textbf{{#1}}\\\\\n\
             \x20   \\textit{{\\small\\textcolor{{textgray}}{{#2}}}} \\hfill \\textcolor{{textgray}}{{\\small #3}}\\\\\n\
             \x20   #4\n\
             \x20   \\vspace{{2pt}}\n\
             }}\n\n\
             \\newcommand{{\\competence}}[2]{{%\n\
             \x20   \\noindent\\textbf{{\\small #1:}} {{\\small #2}}\\\\[1pt]\n\
             }}\n\n\
             \\newcommand{{\\certification}}[1]{{%\n\
             \x20   \\textcolor{{maingreen}}{{\\textbullet}} {{\\small #1}}\\\\[1pt]\n\
             }}\n\n\
             \\begin{{document}}\n\n\
             \\begin{{tikzpicture}}[remember picture, overlay]\n\
             \x20   \\fill[maingreen] (current page.north west) rectangle ([xshift=0.3cm]current page.south west);\n\
             \\end{{tikzpicture}}\n\n\
             \\begin{{center}}\n\
             \x20   {{\\LARGE\\textbf{{{name}}}}}\\\\[3pt]\n\
             \x20   {{\\normalsize\\textcolor{{maingreen}}{{{title}}}}}\\\\[4pt]\n\
             \x20   {{\\small\\textcolor{{textgray}}{{%\n\
             \x20       \\faEnvelope\\ {email} \\quad\n\
             \x20       \\faPhone\\ {phone} \\quad\n\
             \x20       \\faMapMarker\\ {location}\n\
             \x20   }}}}\n\
             \\end{{center}}\n\n\
             \\vspace{{4pt}}\n\n\
             {{\\small\\noindent\\textcolor{{textgray}}{{%\n{summary}\n}}}}\n\n\
             {body}\
             {columns}\n\
             \\end{{document}}\n",
            babel = t.babel,
            name = escape_latex(&adapted.personal.name),
            title = escape_latex(&adapted.display_title),
            email = escape_latex(&adapted.personal.email),
            phone = escape_latex(&adapted.personal.phone),
            location = escape_latex(&adapted.personal.location),
            summary = escape_latex(&adapted.summary),
            body = body,
            columns = columns,
        )
    }

    /// Render the cover-letter `.tex` source. The five segments arrive as
    /// plain text from the composer and are escaped here. `logo_path`
    /// points at an already-fetched local image; `None` drops the line.
    pub fn render_letter(
        adapted: &AdaptedProfile,
        letter: &CoverLetterContent,
        logo_path: Option<&Path>,
    ) -> String {
        let t = LetterPhrases::for_language(adapted.language);
        let colors = adapted.colors.unwrap_or(ColorPair {
            primary: DEFAULT_PRIMARY,
            secondary: DEFAULT_SECONDARY,
        });

        let job_location = if adapted.job_location.is_empty() {
            &adapted.personal.location
        } else {
            &adapted.job_location
        };

        let logo_line = match logo_path {
            Some(path) => format!(
                "\\includegraphics[height=1.2cm]{{{}}}\\\\[0.3cm]\n",
                path.display().to_string().replace('\\', "/"),
            ),
            None => String::new(),
        };

        format!(
            "\\documentclass[11pt,a4paper]{{article}}\n\n\
             \\usepackage[{babel}]{{babel}}\n\
             \\usepackage[T1]{{fontenc}}\n\
             \\usepackage[utf8]{{inputenc}}\n\
             \\usepackage[sfdefault]{{roboto}}\n\
             \\renewcommand{{\\familydefault}}{{\\sfdefault}}\n\n\
             \\usepackage{{geometry}}\n\
             \\usepackage{{parskip}}\n\
             \\usepackage{{microtype}}\n\
             \\usepackage[hidelinks]{{hyperref}}\n\
             \\usepackage{{xcolor}}\n\
             \\usepackage{{tikz}}\n\
             \\usepackage{{fontawesome5}}\n\
             \\usepackage{{graphicx}}\n\n\
             \\geometry{{top=2cm,bottom=2cm,left=2.5cm,right=2cm}}\n\
             \\pagestyle{{empty}}\n\n\
             \\definecolor{{mainblue}}{{RGB}}{{{primary}}}\n\
             \\definecolor{{accentgold}}{{RGB}}{{{secondary}}}\n\
             \\definecolor{{textgray}}{{RGB}}{{80, 80, 80}}\n\n\
             \\begin{{document}}\n\n\
             \\begin{{tikzpicture}}[remember picture, overlay]\n\
             \x20   \\fill[mainblue] (current page.north west) rectangle ([xshift=0.5cm]current page.south west);\n\
             \x20   \\fill[accentgold] ([yshift=-3cm]current page.north west) rectangle ([xshift=0.5cm, yshift=-3.3cm]current page.north west);\n\
             \\end{{tikzpicture}}\n\n\
             \\noindent\n\
             \\begin{{minipage}}[t]{{0.5\\textwidth}}\n\
             \\textbf{{{name}}}\\\\\n{personal_location}\\\\\n{phone}\\\\\n{email}\n\
             \\end{{minipage}}%\n\
             \\hfill\n\
             \\begin{{minipage}}[t]{{0.45\\textwidth}}\n\
             \\raggedleft\n\
             {logo_line}\
             \\textbf{{{company}}}\\\\\n\
             {recruitment}\\\\\n\
             \\textit{{{made_at} {job_location}, {on_date} \\today}}\n\
             \\end{{minipage}}\n\n\
             \\vspace{{1.5cm}}\n\n\
             \\noindent\\textcolor{{mainblue}}{{\\textbf{{{subject}}}}} {application_for} {job_title}\n\n\
             \\vspace{{0.8cm}}\n\n\
             \\noindent {greeting}\n\n\
             \\vspace{{0.5cm}}\n\n\
             \\noindent {hook} {today_intro} \\textbf{{{company}}} {as_position} \\textbf{{{job_title}}}.\n\n\
             \\vspace{{0.4cm}}\n\n\
             \\noindent {employer_fit}\n\n\
             \\vspace{{0.4cm}}\n\n\
             \\noindent {candidate_fit}\n\n\
             \\vspace{{0.4cm}}\n\n\
             \\noindent {collaboration}\n\n\
             \\vspace{{0.4cm}}\n\n\
             \\noindent {closing}\n\n\
             \\vspace{{0.5cm}}\n\n\
             \\hfill \\begin{{minipage}}{{5cm}}\n\
             \\centering\n\
             \\textbf{{{name}}}\n\
             \\end{{minipage}}\n\n\
             \\end{{document}}\n",
            babel = t.babel,
            primary = colors.primary.to_latex(),
            secondary = colors.secondary.to_latex(),
            name = escape_latex(&adapted.personal.name),
            personal_location = escape_latex(&adapted.personal.location),
            phone = escape_latex(&adapted.personal.phone),
            email = escape_latex(&adapted.personal.email),
            logo_line = logo_line,
            company = escape_latex(&adapted.company),
            recruitment = t.recruitment,
            made_at = t.made_at,
            job_location = escape_latex(job_location),
            on_date = t.on_date,
            subject = t.subject,
            application_for = t.application_for,
            job_title = escape_latex(&adapted.job_title),
            greeting = t.greeting,
            today_intro = t.today_intro,
            as_position = t.as_position,
            hook = escape_latex(&letter.hook),
            employer_fit = escape_latex(&letter.employer_fit),
            candidate_fit = escape_latex(&letter.candidate_fit),
            collaboration = escape_latex(&letter.collaboration),
            closing = escape_latex(&letter.closing),
        )
    }

    /// Professional output basenames: `CV_<Name>_<Company>` and
    /// `LM_<Name>_<Company>`, accents stripped, spaces to underscores.
    pub fn output_basenames(name: &str, company: &str) -> (String, String) {
        let name = normalize_for_filename(name);
        let company = normalize_for_filename(company);
        (
            format!("CV_{}_{}", name, company),
            format!("LM_{}_{}", name, company),
        )
    }
}

/// ASCII-fold the characters common in French names, drop the rest of the
/// punctuation, underscore the spaces.
pub fn normalize_for_filename(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'à' | 'â' | 'ä' => out.push('a'),
            'é' | 'è' | 'ê' | 'ë' => out.push('e'),
            'î' | 'ï' => out.push('i'),
            'ô' | 'ö' => out.push('o'),
            'ù' | 'û' | 'ü' => out.push('u'),
            'ç' => out.push('c'),
            'À' | 'Â' | 'Ä' => out.push('A'),
            'É' | 'È' | 'Ê' | 'Ë' => out.push('E'),
            'Î' | 'Ï' => out.push('I'),
            'Ô' | 'Ö' => out.push('O'),
            'Ù' | 'Û' | 'Ü' => out.push('U'),
            'Ç' => out.push('C'),
            ' ' => out.push('_'),
            c if c.is_ascii_alphanumeric() || c == '_' => out.push(c),
            _ => {}
        }
    }
    out
}
