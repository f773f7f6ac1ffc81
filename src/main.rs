fn main() {
    game_catalog_lib::run()
}
