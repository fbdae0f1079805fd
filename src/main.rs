use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vanshavali::config::Config;
use vanshavali::fuzzy::{SearchFilter, search};
use vanshavali::gender::{GenderClassifier, NameHeuristic};
use vanshavali::index::{IndexedPerson, PersonIndex};
use vanshavali::persist::{FileStore, RecordSource, export_snippet};
use vanshavali::phrases::{Language, Phrasebook, join_names};
use vanshavali::relation::{describe_relation, relate};
use vanshavali::resolver::{Context, Resolver, Spotlight};
use vanshavali::store::{FamilyTree, NewMember};
use vanshavali::{LineageError, PersonId, Result};

#[derive(Parser)]
#[command(name = "vanshavali", about = "Family tree lineage engine")]
struct Cli {
    /// Config file (default: ./vanshavali.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Base record file, overrides `data_file` from the config
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// Answer language: hindi or english
    #[arg(long, global = true)]
    language: Option<Language>,
    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer one question, e.g. "1950 में कौन पैदा हुआ?"
    Ask { text: Vec<String> },
    /// Interactive session on stdin; pronouns refer to the last person named
    Chat,
    /// What B is to A
    Relate { a: String, b: String },
    /// Member and generation counts
    Stats,
    /// Print the tree, optionally from a given member down
    Tree {
        #[arg(long)]
        root: Option<String>,
    },
    /// List the members of one generation
    Generation { number: u32 },
    /// Ranked search by name, father's name or birth year
    Search {
        query: Vec<String>,
        #[arg(long, default_value = "all")]
        filter: SearchFilter,
    },
    /// Details of one member
    Person { name: Vec<String> },
    /// Ancestors, their siblings and all descendants of a member
    Lineage { name: Vec<String> },
    /// Add a child under an existing member and save the edit
    Add {
        /// Parent id or name
        #[arg(long)]
        parent: String,
        /// Name in Devanagari
        #[arg(long)]
        name: String,
        #[arg(long)]
        name_en: Option<String>,
        #[arg(long)]
        birth_year: Option<i32>,
    },
    /// Write the current records as a `const familyMembers = [...];` snippet
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Discard saved edits and return to the base data
    Reset,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code()
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "vanshavali=debug"
    } else {
        "vanshavali=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config.data_file = data;
    }
    if let Some(language) = cli.language {
        config.language = language;
    }
    let session = Session::open(config)?;

    match cli.command {
        Command::Ask { text } => session.run_ask(&text.join(" ")),
        Command::Chat => session.run_chat(),
        Command::Relate { a, b } => session.run_relate(&a, &b),
        Command::Stats => session.run_stats(),
        Command::Tree { root } => session.run_tree(root.as_deref()),
        Command::Generation { number } => session.run_generation(number),
        Command::Search { query, filter } => session.run_search(&query.join(" "), filter),
        Command::Person { name } => session.run_person(&name.join(" ")),
        Command::Lineage { name } => session.run_lineage(&name.join(" ")),
        Command::Add {
            parent,
            name,
            name_en,
            birth_year,
        } => session.run_add(&parent, name, name_en, birth_year),
        Command::Export { out } => session.run_export(out),
        Command::Reset => session.run_reset(),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  SESSION: config + record store + built tree
// ═══════════════════════════════════════════════════════════════════════

struct Session {
    store: FileStore,
    tree: FamilyTree,
    classifier: NameHeuristic,
    phrases: Phrasebook,
}

impl Session {
    fn open(config: Config) -> Result<Self> {
        let store = config.store();
        let tree = FamilyTree::from_records(store.load()?);
        let diag = tree.diagnostics();
        if diag.root_fallback {
            eprintln!("warning: no parentless record; the first record was used as root");
        }
        if diag.unreachable > 0 {
            eprintln!("warning: {} records are not connected to the root", diag.unreachable);
        }
        Ok(Session {
            store,
            tree,
            classifier: config.classifier(),
            phrases: Phrasebook::new(config.language),
        })
    }

    fn index(&self) -> Result<&PersonIndex> {
        self.tree.index()
    }

    fn name_of<'p>(&self, person: &'p IndexedPerson) -> &'p str {
        self.phrases.name_of(person)
    }

    // ═══════════════════════════════════════════════════════════════════
    //  QUESTIONS
    // ═══════════════════════════════════════════════════════════════════

    fn resolver<'a>(&'a self, index: &'a PersonIndex, spotlight: &'a PathSpotlight<'a>) -> Resolver<'a> {
        Resolver::new(index, self.phrases.language, &self.classifier).with_spotlight(spotlight)
    }

    fn run_ask(&self, text: &str) -> Result<()> {
        let index = self.index()?;
        let spotlight = PathSpotlight { index };
        let (answer, _) = self.resolver(index, &spotlight).resolve(text, Context::default());
        println!("{answer}");
        Ok(())
    }

    fn run_chat(&self) -> Result<()> {
        let index = self.index()?;
        let spotlight = PathSpotlight { index };
        let resolver = self.resolver(index, &spotlight);
        let mut context = Context::default();

        eprintln!("Ask about the family; an empty line or 'exit' quits.");
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            eprint!("> ");
            io::stderr().flush()?;
            let Some(line) = lines.next() else { break };
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line == "exit" || line == "quit" {
                break;
            }
            let (answer, next) = resolver.resolve(line, context);
            context = next;
            println!("{answer}");
        }
        Ok(())
    }

    fn run_relate(&self, a: &str, b: &str) -> Result<()> {
        let index = self.index()?;
        let a = self.tree.lookup(a)?;
        let b = self.tree.lookup(b)?;
        let result = relate(index, &self.classifier, a, b);
        println!("{}", describe_relation(index, &self.phrases, a, b, &result));
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    //  BROWSING
    // ═══════════════════════════════════════════════════════════════════

    fn run_stats(&self) -> Result<()> {
        let index = self.index()?;
        println!("Members:     {}", index.total());
        println!("Generations: {}", index.max_generation());
        for (generation, count) in index.generation_sizes() {
            println!("  {generation:>3}: {count}");
        }
        if let Some(root) = index.root() {
            println!("Root:        {}", format_person_line(root));
        }
        Ok(())
    }

    fn run_tree(&self, root: Option<&str>) -> Result<()> {
        let index = self.index()?;
        let start = match root {
            Some(name) => self.tree.lookup(name)?,
            None => index.root().ok_or(LineageError::NotIndexed)?,
        };
        println!("{}", format_person_line(start));
        render_children(index, start, "");
        Ok(())
    }

    fn run_generation(&self, number: u32) -> Result<()> {
        let index = self.index()?;
        let members = index.generation(number);
        if members.is_empty() {
            eprintln!("No members in generation {number}");
        }
        for person in members {
            let father = index.parent(person).map_or("-", |f| self.name_of(f));
            println!("{}  (father: {father})", format_person_line(person));
        }
        Ok(())
    }

    fn run_search(&self, query: &str, filter: SearchFilter) -> Result<()> {
        let index = self.index()?;
        let hits = search(index, query, filter);
        if hits.is_empty() {
            eprintln!("No matches for '{query}'");
        }
        for hit in hits {
            println!("{:>4}  {}", hit.score, format_person_line(hit.person));
        }
        Ok(())
    }

    fn run_person(&self, name: &str) -> Result<()> {
        let index = self.index()?;
        let person = self.tree.lookup(name)?;
        let names = |people: &[&IndexedPerson]| {
            join_names(people.iter().map(|p| self.name_of(p)))
        };

        println!("{}", format_person_line(person));
        println!("  generation: {}", person.generation);
        println!("  gender:     {:?}", self.classifier.classify(person));
        if let Some(father) = index.parent(person) {
            println!("  father:     {}", self.name_of(father));
        }
        let ancestors = index.ancestors(person);
        if !ancestors.is_empty() {
            let line: Vec<&str> = ancestors.iter().map(|p| self.name_of(p)).collect();
            println!("  ancestry:   {}", line.join(" → "));
        }
        let siblings = index.siblings(person);
        if !siblings.is_empty() {
            println!("  siblings:   {}", names(&siblings));
        }
        let children = index.children(person);
        if !children.is_empty() {
            println!("  children:   {}", names(&children));
        }
        Ok(())
    }

    fn run_lineage(&self, name: &str) -> Result<()> {
        let index = self.index()?;
        let person = self.tree.lookup(name)?;
        for id in index.extended_lineage(person.id) {
            if let Some(p) = index.get(id) {
                println!("{}", format_person_line(p));
            }
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    //  EDITING
    // ═══════════════════════════════════════════════════════════════════

    fn run_add(
        mut self,
        parent: &str,
        name: String,
        name_en: Option<String>,
        birth_year: Option<i32>,
    ) -> Result<()> {
        let parent: PersonId = self.tree.lookup(parent)?.id;
        let id = self.tree.add_member(NewMember {
            parent,
            name,
            name_en,
            birth_year,
        })?;
        self.store.save(self.tree.records())?;

        let index = self.index()?;
        if let Some(added) = index.get(id) {
            println!("Added {}", format_person_line(added));
        }
        eprintln!("  saved to {}", self.store.edits_path().display());
        Ok(())
    }

    fn run_export(&self, out: Option<PathBuf>) -> Result<()> {
        let snippet = export_snippet(self.tree.records())?;
        match out {
            Some(path) => {
                fs::write(&path, &snippet)?;
                eprintln!("  {} ({} bytes)", path.display(), snippet.len());
            }
            None => println!("{snippet}"),
        }
        Ok(())
    }

    fn run_reset(&self) -> Result<()> {
        if !self.store.has_edits() {
            eprintln!("No saved edits; already on base data");
            return Ok(());
        }
        self.store.reset()?;
        println!(
            "Discarded saved edits; using {}",
            self.store.base_path().display()
        );
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  RENDERING
// ═══════════════════════════════════════════════════════════════════════

/// "id name (romanized, year)".
fn format_person_line(person: &IndexedPerson) -> String {
    let mut extra = Vec::new();
    if let Some(en) = person.name_en.as_deref().filter(|n| !n.is_empty()) {
        extra.push(en.to_string());
    }
    if let Some(year) = person.birth_year {
        extra.push(year.to_string());
    }
    if extra.is_empty() {
        format!("{} {}", person.id, person.name)
    } else {
        format!("{} {} ({})", person.id, person.name, extra.join(", "))
    }
}

/// Recursively render children with box-drawing characters.
///
/// `prefix` is the accumulated line-drawing prefix for the current depth.
fn render_children(index: &PersonIndex, person: &IndexedPerson, prefix: &str) {
    let children = index.children(person);
    let total = children.len();

    for (i, child) in children.iter().enumerate() {
        let is_last = i == total - 1;
        let connector = if is_last { "└─ " } else { "├─ " };
        let continuation = if is_last { "   " } else { "│  " };

        println!("{}{}{}", prefix, connector, format_person_line(child));
        let sub_prefix = format!("{}{}", prefix, continuation);
        render_children(index, child, &sub_prefix);
    }
}

/// Answers "show X" by printing X's line of descent from the root.
struct PathSpotlight<'a> {
    index: &'a PersonIndex,
}

impl Spotlight for PathSpotlight<'_> {
    fn show(&self, id: PersonId) {
        let Some(person) = self.index.get(id) else {
            return;
        };
        let mut path: Vec<String> = self
            .index
            .ancestor_path(person)
            .iter()
            .map(|p| p.name.clone())
            .collect();
        path.reverse();
        println!("{}", path.join(" → "));
    }
}
