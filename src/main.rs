fn main() {
    obstacle_run::game::run();
}
