// 🎮 Interaction Shell - the park selection game as a finite-state machine
//
// The shell never reads or writes the terminal. Each input line produces a
// list of effects; the TUI and the plain line-mode driver render them.
//
//   MainMenu ──2──▶ StateSelect ──▶ ContinuePrompt(Topics) ──YES──▶ TopicSelect
//      ▲                 │                 │NO                          │
//      │                 │1 park           ▼                            ▼
//      └──QUIT── FinalInteraction ◀────────┴──── ContinuePrompt(Activities) ─▶ ActivitySelect

use crate::catalog::{Catalog, Park};
use crate::error::{ParkError, ParkResult};
use crate::filter::{
    available_activities, available_topics, filter_by_activities, filter_by_state,
    filter_by_topics, StageOutcome,
};
use crate::tree::SelectionTree;

// ============================================================================
// STATES AND EFFECTS
// ============================================================================

/// Narrowing stage that follows the state selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Topics,
    Activities,
}

impl Stage {
    fn question(&self) -> &'static str {
        match self {
            Stage::Topics => "Selected Topics",
            Stage::Activities => "Selected Activities",
        }
    }

    fn plural(&self) -> &'static str {
        match self {
            Stage::Topics => "topics",
            Stage::Activities => "activities",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    MainMenu,
    StateSelect,
    /// Asking whether to go on to the given stage
    ContinuePrompt(Stage),
    TopicSelect,
    ActivitySelect,
    FinalInteraction,
    Exit,
}

/// What a front-end should show or do after an input
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Message(String),
    /// Section heading
    Notice(String),
    /// Recoverable input error; the same prompt is shown again
    Invalid(String),
    Parks { title: String, names: Vec<String> },
    Options { title: String, items: Vec<String> },
    Tree(Vec<(usize, String)>),
    OpenUrl(String),
    DrawMap(Vec<Park>),
    DrawChart(Vec<Park>),
}

/// One play-through of the selection game
#[derive(Debug, Clone)]
struct Game {
    state_code: String,
    tree: SelectionTree,
    candidates: Vec<Park>,
    options: Vec<String>,
}

// ============================================================================
// SHELL
// ============================================================================

pub struct Shell {
    catalog: Catalog,
    state: ShellState,
    game: Option<Game>,
}

impl Shell {
    pub fn new(catalog: Catalog) -> Self {
        Shell {
            catalog,
            state: ShellState::MainMenu,
            game: None,
        }
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn is_finished(&self) -> bool {
        self.state == ShellState::Exit
    }

    /// Candidates of the running game, if any
    pub fn candidates(&self) -> Option<&[Park]> {
        self.game.as_ref().map(|g| g.candidates.as_slice())
    }

    /// Effects to show before the first input
    pub fn start(&mut self) -> Vec<Effect> {
        self.state = ShellState::MainMenu;
        vec![
            Effect::Notice("WELCOME TO THE PARK SELECTION GAME!".to_string()),
            main_menu(),
        ]
    }

    /// Prompt for the current state
    pub fn prompt(&self) -> &'static str {
        match self.state {
            ShellState::MainMenu => "Please enter your selection. Enter \"QUIT\" to leave the program.",
            ShellState::StateSelect => "What state do you want to visit? Use 2 character state abbreviation.",
            ShellState::ContinuePrompt(_) => "Would you like to continue with questions (YES/NO)?",
            ShellState::TopicSelect => "Enter number(s) corresponding to topic(s), e.g. 1,2,3.",
            ShellState::ActivitySelect => {
                "Enter number(s) corresponding to activity/activities, e.g. 1,2,3."
            }
            ShellState::FinalInteraction => {
                "Enter a park number to open its webpage, \"MAP\", \"BAR\" or \"QUIT\"."
            }
            ShellState::Exit => "",
        }
    }

    /// Feed one line of input
    pub fn handle(&mut self, input: &str) -> Vec<Effect> {
        let input = input.trim();

        let result = match self.state {
            ShellState::MainMenu => self.on_main_menu(input),
            ShellState::StateSelect => self.on_state(input),
            ShellState::ContinuePrompt(stage) => self.on_continue(stage, input),
            ShellState::TopicSelect => self.on_selection(Stage::Topics, input),
            ShellState::ActivitySelect => self.on_selection(Stage::Activities, input),
            ShellState::FinalInteraction => self.on_final(input),
            ShellState::Exit => Ok(Vec::new()),
        };

        match result {
            Ok(effects) => effects,
            Err(e) => vec![Effect::Invalid(e.to_string())],
        }
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    fn on_main_menu(&mut self, input: &str) -> ParkResult<Vec<Effect>> {
        match input.to_uppercase().as_str() {
            "1" => Ok(vec![
                Effect::DrawMap(self.catalog.parks().to_vec()),
                Effect::Message("Your map has been generated.".to_string()),
            ]),
            "2" => {
                self.game = None;
                self.state = ShellState::StateSelect;
                Ok(vec![Effect::Notice(
                    "NOW STARTING THE PARK SELECTION GAME! ★ ★ ★".to_string(),
                )])
            }
            "QUIT" => {
                self.state = ShellState::Exit;
                Ok(vec![Effect::Message("Goodbye!".to_string())])
            }
            _ => Err(invalid("Please enter a valid selection.")),
        }
    }

    fn on_state(&mut self, input: &str) -> ParkResult<Vec<Effect>> {
        if input.eq_ignore_ascii_case("QUIT") {
            return Ok(self.back_to_menu());
        }

        let code = input.to_uppercase();
        if !self.catalog.state_codes().contains(&code) {
            return Err(invalid(
                "Please enter a valid state. Use 2 character state abbreviation. \
                 If there are no parks in chosen state, input is considered invalid.",
            ));
        }

        let parks = filter_by_state(self.catalog.parks(), &code);
        let mut tree = SelectionTree::new();
        tree.append(None, "Select State", vec![code.clone()], park_names(&parks));

        let mut effects = vec![Effect::Parks {
            title: format!("Here are parks in the state {}.", code),
            names: park_names(&parks),
        }];

        let terminal = parks.len() == 1;
        self.game = Some(Game {
            state_code: code,
            tree,
            candidates: parks,
            options: Vec::new(),
        });

        if terminal {
            effects.extend(self.enter_final());
        } else {
            self.state = ShellState::ContinuePrompt(Stage::Topics);
        }

        Ok(effects)
    }

    fn on_continue(&mut self, next: Stage, input: &str) -> ParkResult<Vec<Effect>> {
        match input.to_uppercase().as_str() {
            "YES" => Ok(self.begin_stage(next)),
            "NO" => Ok(self.enter_final()),
            "QUIT" => Ok(self.back_to_menu()),
            _ => Err(invalid("Response invalid. Please respond either YES or NO.")),
        }
    }

    fn begin_stage(&mut self, stage: Stage) -> Vec<Effect> {
        let Some(game) = self.game.as_mut() else {
            return self.back_to_menu();
        };

        game.options = match stage {
            Stage::Topics => available_topics(&game.candidates),
            Stage::Activities => available_activities(&game.candidates),
        };

        if game.options.is_empty() {
            let mut effects = vec![Effect::Message(format!(
                "There are no {} to choose from for these parks.",
                stage.plural()
            ))];
            effects.extend(self.enter_final());
            return effects;
        }

        self.state = match stage {
            Stage::Topics => ShellState::TopicSelect,
            Stage::Activities => ShellState::ActivitySelect,
        };

        vec![Effect::Options {
            title: format!("Here is a list of available {}.", stage.plural()),
            items: game.options.clone(),
        }]
    }

    fn on_selection(&mut self, stage: Stage, input: &str) -> ParkResult<Vec<Effect>> {
        if input.eq_ignore_ascii_case("QUIT") {
            return Ok(self.back_to_menu());
        }

        let Some(game) = self.game.as_mut() else {
            return Ok(self.back_to_menu());
        };

        let picks = parse_selection(input, game.options.len())?;
        let choices: Vec<String> = picks.iter().map(|i| game.options[i - 1].clone()).collect();

        let result = match stage {
            Stage::Topics => filter_by_topics(&game.candidates, &choices),
            Stage::Activities => filter_by_activities(&game.candidates, &choices),
        };

        let parent = game.tree.last();
        game.tree.append(parent, stage.question(), choices.clone(), park_names(&result));

        let outcome = StageOutcome::classify(&game.candidates, result);
        let mut effects = Vec::new();

        if outcome.is_empty() {
            effects.push(Effect::Message(format!(
                "We're sorry. There are no parks in {} with choices: {}",
                game.state_code,
                choices.join(", ")
            )));
        } else {
            let parks = outcome.candidates();
            effects.push(Effect::Parks {
                title: format!(
                    "Here are parks in state {} with choices {}.",
                    game.state_code,
                    choices.join(", ")
                ),
                names: park_names(&parks),
            });
        }

        let finished = stage == Stage::Activities || outcome.is_terminal() || outcome.is_empty();
        game.candidates = outcome.candidates();

        if finished {
            effects.extend(self.enter_final());
        } else {
            self.state = ShellState::ContinuePrompt(Stage::Activities);
        }

        Ok(effects)
    }

    fn enter_final(&mut self) -> Vec<Effect> {
        let Some(game) = self.game.as_ref() else {
            return self.back_to_menu();
        };

        self.state = ShellState::FinalInteraction;
        vec![
            Effect::Notice("Here is your park question tree:".to_string()),
            Effect::Tree(game.tree.render()),
            Effect::Parks {
                title: "Here are your selected parks:".to_string(),
                names: park_names(&game.candidates),
            },
        ]
    }

    fn on_final(&mut self, input: &str) -> ParkResult<Vec<Effect>> {
        let candidates = match self.game.as_ref() {
            Some(game) => game.candidates.clone(),
            None => return Ok(self.back_to_menu()),
        };

        if let Ok(n) = input.parse::<usize>() {
            let park = n
                .checked_sub(1)
                .and_then(|i| candidates.get(i))
                .ok_or_else(|| invalid("Please enter a valid response."))?;

            return Ok(vec![
                Effect::Message(format!("Loading {} in a new window...", park.url)),
                Effect::OpenUrl(park.url.clone()),
            ]);
        }

        match input.to_uppercase().as_str() {
            "MAP" => Ok(vec![Effect::DrawMap(candidates)]),
            "BAR" => Ok(vec![Effect::DrawChart(candidates)]),
            "QUIT" => Ok(self.back_to_menu()),
            _ => Err(invalid("Please enter a valid response.")),
        }
    }

    fn back_to_menu(&mut self) -> Vec<Effect> {
        self.game = None;
        self.state = ShellState::MainMenu;
        vec![main_menu()]
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn main_menu() -> Effect {
    Effect::Options {
        title: "You are on the program's MAIN PAGE. Choose from the following options:".to_string(),
        items: vec![
            "Generate map of all US National Parks.".to_string(),
            "Play park selection game.".to_string(),
        ],
    }
}

fn invalid(message: &str) -> ParkError {
    ParkError::InvalidUserInput(message.to_string())
}

fn park_names(parks: &[Park]) -> Vec<String> {
    parks.iter().map(|p| p.name.clone()).collect()
}

/// Parse "1,3, 2" into 1-based picks, first occurrence order, duplicates dropped
pub fn parse_selection(input: &str, count: usize) -> ParkResult<Vec<usize>> {
    let usage = || {
        invalid("Input invalid. If entered more than one value, use format \"1,2,3\".")
    };

    let mut picks = Vec::new();
    for token in input.split(',') {
        let n: usize = token.trim().parse().map_err(|_| usage())?;
        if n == 0 || n > count {
            return Err(usage());
        }
        if !picks.contains(&n) {
            picks.push(n);
        }
    }

    Ok(picks)
}

// ============================================================================
// TESTS
// ============================================================================
