use sweep_rs::minefield::Minefield;
use sweep_rs::Game;

enum DebugAction {
    Reveal((u16, u16)),
    Flag((u16, u16)),
}

fn get_action() -> Option<DebugAction> {
    println!("Enter the desired action and the target cell's coordinates (e.g. `f 3,5` to flag the cell at x = 3, y = 5):");

    let mut input = String::new();
    std::io::stdin().read_line(&mut input).ok()?;

    let [action, cell_position]: [&str; 2] = input
        .split_whitespace()
        .collect::<Vec<&str>>()
        .as_slice()
        .try_into()
        .ok()?;

    let cell_position = cell_position
        .trim()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect::<Vec<u16>>();

    let cell_position = (*cell_position.first()?, *cell_position.get(1)?);

    match action {
        "r" => Some(DebugAction::Reveal(cell_position)),
        "f" => Some(DebugAction::Flag(cell_position)),
        _ => None,
    }
}

fn print_minefield(minefield: &Minefield) {
    println!("DISPLAY:\n{}", minefield);
    // println!("DEBUG:\n{:?}", minefield);
}

fn main() {
    let mut game = Game::new(9, 9, 10).expect("Couldn't create a game instance!");

    print_minefield(game.minefield());

    loop {
        let Some(action) = get_action() else {
            println!("Incorrect input! Please, try again.");
            continue;
        };

        let result = match action {
            DebugAction::Reveal((x, y)) => game.reveal(x, y).map(|changed| changed.len()),
            DebugAction::Flag((x, y)) => game.flag(x, y).map(usize::from),
        };

        match result {
            Ok(changed_amount) => println!("{changed_amount} cell(s) changed"),
            Err(error) => {
                println!("{error}");
                continue;
            }
        }

        print_minefield(game.minefield());

        if game.outcome().is_over() {
            println!("{:?}", game.outcome());
            break;
        }
    }
}
